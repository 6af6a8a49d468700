// Terminal UI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest snapshot of the active page
// plus purely local state (focus, squad cursor, quit dialog). The app
// orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream};
use crossterm::execute;
use futures_util::StreamExt;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::warn;

use crate::protocol::{AppSnapshot, PageId, PageSnapshot, ResultsSnapshot, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state used by `render_frame`.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Latest snapshot of the active page; `None` until the first arrives.
    pub snapshot: Option<AppSnapshot>,
    /// Which tab is shown, as last reported by the app.
    pub active_tab: PageId,
    /// Whether keystrokes go to the search box.
    pub search_mode: bool,
    /// Highlighted squad row for role toggles and removal.
    pub squad_cursor: usize,
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            snapshot: None,
            active_tab: PageId::Fantasy,
            search_mode: false,
            squad_cursor: 0,
            confirm_quit: false,
        }
    }
}

impl ViewState {
    /// The snapshot of the shown page, if it has arrived.
    ///
    /// A snapshot for a different page is not shown.
    pub fn page(&self) -> Option<&PageSnapshot> {
        self.snapshot
            .as_ref()
            .map(|s| &s.page)
            .filter(|p| p.id == self.active_tab)
    }

    pub fn squad_len(&self) -> usize {
        self.page().map_or(0, |p| p.squad.len())
    }

    pub fn has_squad(&self) -> bool {
        self.active_tab.has_squad()
    }

    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        if snapshot.active != self.active_tab {
            self.active_tab = snapshot.active;
            self.squad_cursor = 0;
            self.search_mode = false;
        }
        let len = snapshot.page.squad.len();
        self.squad_cursor = self.squad_cursor.min(len.saturating_sub(1));
        self.snapshot = Some(snapshot);
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => state.apply_snapshot(*snapshot),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area(), state.has_squad());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::search::render_input(frame, layout.search_input, state);
    widgets::search::render_suggestions(frame, layout.suggestions, state);
    if state.has_squad() {
        widgets::squad::render(frame, layout.squad, state);
    }
    render_results(frame, &layout, state);
    render_help_bar(frame, &layout, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area(), state.squad_len());
    }
}

fn render_results(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let Some(page) = state.page() else {
        frame.render_widget(Block::default().borders(Borders::ALL), layout.results);
        return;
    };
    match &page.results {
        ResultsSnapshot::Fantasy { status, estimate } => {
            widgets::estimate::render_fantasy(frame, layout.results, page, *status, estimate.as_ref())
        }
        ResultsSnapshot::Performance { status, prediction } => {
            widgets::estimate::render_performance(
                frame,
                layout.results,
                page,
                *status,
                prediction.as_ref(),
            )
        }
        ResultsSnapshot::Stats { status, stats } => {
            widgets::stats::render(frame, layout.results, page, *status, stats.as_ref())
        }
        ResultsSnapshot::Clustering {
            mode,
            status,
            player,
            clusters,
        } => widgets::clusters::render(
            frame,
            layout.results,
            page,
            *mode,
            *status,
            player.as_ref(),
            clusters,
        ),
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let text = help_text(state);
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

/// Key hints for the current mode and page.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.search_mode {
        return " Type to search | Up/Down:Move | Enter:Select | Esc:Done";
    }
    match state.active_tab {
        PageId::Fantasy => " q:Quit | 1-4:Tabs | /:Search | j/k:Move | c:Captain | v:Vice | d:Remove",
        PageId::Performance => " q:Quit | 1-4:Tabs | /:Search | j/k:Move | d:Remove | p:Predict",
        PageId::Stats => " q:Quit | 1-4:Tabs | /:Search",
        PageId::Clustering => " q:Quit | 1-4:Tabs | /:Search | m:Batters/Bowlers",
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal and enables mouse capture.
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, input events, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // The app loop has exited.
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                let cmd = match maybe_event {
                    Some(Ok(Event::Key(key_event))) => input::handle_key(key_event, &mut view_state),
                    Some(Ok(Event::Mouse(mouse_event))) => {
                        let size = terminal.size()?;
                        let area = Rect::new(0, 0, size.width, size.height);
                        let layout = build_layout(area, view_state.has_squad());
                        input::handle_mouse(mouse_event, &mut view_state, &layout)
                    }
                    Some(Ok(_)) => None,
                    Some(Err(e)) => {
                        warn!("Input error: {}", e);
                        break;
                    }
                    None => break,
                };

                if let Some(cmd) = cmd {
                    let quit = cmd == UserCommand::Quit;
                    if cmd_tx.send(cmd).await.is_err() || quit {
                        break;
                    }
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
