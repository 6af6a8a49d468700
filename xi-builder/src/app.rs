// Application state and orchestration logic.
//
// The central event loop that applies user commands from the TUI and backend
// completions from spawned request tasks to the page states, then pushes a
// fresh snapshot to the TUI render loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::Backend;
use crate::config::Config;
use crate::page::Page;
use crate::protocol::{
    AppSnapshot, BackendEvent, BackendRequest, PageId, SearchKey, UiUpdate, UserCommand,
};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    /// One entry per `PageId`, in tab order.
    pages: Vec<Page>,
    pub active: PageId,
    /// Shared with every spawned request task.
    pub backend: Arc<dyn Backend>,
    /// Spawned tasks report completions through a clone of this sender.
    pub backend_tx: mpsc::Sender<BackendEvent>,
}

impl AppState {
    pub fn new(
        config: Config,
        backend: Arc<dyn Backend>,
        backend_tx: mpsc::Sender<BackendEvent>,
    ) -> Self {
        let max_size = config.squad.max_size;
        let pages = PageId::ALL
            .iter()
            .map(|&id| Page::new(id, max_size))
            .collect();
        AppState {
            config,
            pages,
            active: PageId::Fantasy,
            backend,
            backend_tx,
        }
    }

    pub fn page(&self, id: PageId) -> &Page {
        &self.pages[id.index()]
    }

    fn page_mut(&mut self, id: PageId) -> &mut Page {
        &mut self.pages[id.index()]
    }

    pub fn active_page(&self) -> &Page {
        self.page(self.active)
    }

    /// Activate the initial page. Returns the universe load for it.
    pub fn start(&mut self) -> Vec<BackendRequest> {
        let active = self.active;
        self.page_mut(active).activate()
    }

    /// Apply a user command to the active page.
    pub fn handle_user_command(&mut self, cmd: UserCommand) -> Vec<BackendRequest> {
        let active = self.active;
        match cmd {
            UserCommand::SwitchTab(page) => {
                if page != active {
                    info!("Switched to tab: {:?}", page);
                    // Leaving a page is a blur for its selector.
                    self.page_mut(active).handle_search(SearchKey::Blur);
                }
                self.active = page;
                self.page_mut(page).activate()
            }
            UserCommand::Search(key) => self.page_mut(active).handle_search(key),
            UserCommand::ToggleRole { index, role } => self.page_mut(active).toggle_role(index, role),
            UserCommand::RemoveMember(index) => self.page_mut(active).remove_member(index),
            UserCommand::Predict => self.page_mut(active).request_prediction(),
            UserCommand::SetClusterMode(mode) => self.page_mut(active).set_cluster_mode(mode),
            UserCommand::Quit => Vec::new(),
        }
    }

    /// Route a backend completion to the page it belongs to, active or not.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        let page = event.page();
        self.page_mut(page).apply(event);
    }

    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            active: self.active,
            page: self.active_page().snapshot(),
        }
    }

    /// Spawn one task per request. Requests are never cancelled; the pages
    /// discard superseded completions by generation.
    pub fn dispatch(&self, requests: Vec<BackendRequest>) {
        for request in requests {
            let backend = Arc::clone(&self.backend);
            let tx = self.backend_tx.clone();
            tokio::spawn(async move {
                let event = perform(backend.as_ref(), request).await;
                if tx.send(event).await.is_err() {
                    debug!("backend event channel closed, dropping completion");
                }
            });
        }
    }
}

/// Execute one request against the backend and wrap the outcome as an event.
pub async fn perform(backend: &dyn Backend, request: BackendRequest) -> BackendEvent {
    match request {
        BackendRequest::LoadUniverse { page, generation } => BackendEvent::UniverseLoaded {
            page,
            generation,
            result: backend
                .fetch_universe(page)
                .await
                .map_err(|e| e.to_string()),
        },
        BackendRequest::Estimate {
            generation,
            request,
        } => BackendEvent::EstimateReady {
            generation,
            result: backend.estimate(&request).await.map_err(|e| e.to_string()),
        },
        BackendRequest::Profile { name } => {
            let result = backend
                .player_profile(&name)
                .await
                .map_err(|e| e.to_string());
            BackendEvent::ProfileReady { name, result }
        }
        BackendRequest::Predict { generation, squad } => BackendEvent::PredictionReady {
            generation,
            result: backend
                .predict_performance(&squad)
                .await
                .map_err(|e| e.to_string()),
        },
        BackendRequest::Stats { generation, name } => BackendEvent::StatsReady {
            generation,
            result: backend.batter_stats(&name).await.map_err(|e| e.to_string()),
        },
        BackendRequest::LoadClusters { mode, generation } => BackendEvent::ClustersLoaded {
            mode,
            generation,
            result: backend.clusters(mode).await.map_err(|e| e.to_string()),
        },
        BackendRequest::ClusterLookup {
            mode,
            generation,
            name,
        } => BackendEvent::ClusterReady {
            generation,
            result: backend
                .player_cluster(mode, &name)
                .await
                .map_err(|e| e.to_string()),
        },
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Completions from spawned backend tasks
///
/// Every handled message is followed by a snapshot on `ui_tx`.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut backend_rx: mpsc::Receiver<BackendEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let initial = state.start();
    state.dispatch(initial);
    push_snapshot(&state, &ui_tx).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        let requests = state.handle_user_command(cmd);
                        state.dispatch(requests);
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            event = backend_rx.recv() => {
                match event {
                    Some(event) => state.handle_backend_event(event),
                    None => {
                        info!("Backend channel closed, shutting down");
                        break;
                    }
                }
            }
        }

        push_snapshot(&state, &ui_tx).await;
    }

    info!("Application event loop exiting");
    Ok(())
}

async fn push_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    if ui_tx
        .send(UiUpdate::Snapshot(Box::new(snapshot)))
        .await
        .is_err()
    {
        debug!("UI channel closed, snapshot dropped");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
