// Per-page state: one selector, its candidate list, and the page's body.
//
// Every page owns its own Selector and chosen set; nothing is shared between
// pages. Methods that can trigger backend work return the requests to send
// instead of sending them, so the page stays synchronous and testable.

use tracing::{debug, info, warn};

use crate::api::{
    cluster_members, BatterStats, Cluster, ClusterMode, EstimateRequest, FantasyEstimate,
    PerformanceEntry, PerformancePrediction, PlayerCluster,
};
use crate::protocol::{
    BackendEvent, BackendRequest, MemberRow, PageId, PageSnapshot, PanelError, ResultsSnapshot,
    SearchKey, SearchSnapshot, SuggestionRow,
};
use crate::request::{RequestSlot, RequestStatus};
use crate::squad::{Role, Selection};
use crate::typeahead::matcher::{filter, ExclusionSet, Universe};
use crate::typeahead::{CommitOutcome, Selector, SinglePick};

pub const NO_MATCH_HINT: &str = "No players found";
const PREDICT_EMPTY_HINT: &str = "Add players before predicting";
const PREDICT_PENDING_HINT: &str = "Player details are still loading";

// ---------------------------------------------------------------------------
// Page bodies
// ---------------------------------------------------------------------------

/// Squad with captain/vice-captain; estimated automatically once complete.
#[derive(Debug, Clone)]
pub struct FantasyPanel {
    pub squad: Selection,
    pub estimate: RequestSlot<FantasyEstimate>,
}

/// Squad without roles; each add fetches the player's profile and the
/// prediction is requested explicitly.
#[derive(Debug, Clone)]
pub struct PerformancePanel {
    pub squad: Selection,
    pub prediction: RequestSlot<PerformancePrediction>,
}

/// Single-pick lookup.
#[derive(Debug, Clone, Default)]
pub struct StatsPanel {
    pub pick: SinglePick,
    pub stats: RequestSlot<BatterStats>,
}

/// Single-pick lookup over the members of one cluster table. The universe
/// and the table both come from the same load and are replaced on a mode
/// switch.
#[derive(Debug, Clone, Default)]
pub struct ClusterPanel {
    pub mode: ClusterMode,
    pub pick: SinglePick,
    pub clusters: Vec<Cluster>,
    pub lookup: RequestSlot<PlayerCluster>,
}

#[derive(Debug, Clone)]
pub enum PageBody {
    Fantasy(FantasyPanel),
    Performance(PerformancePanel),
    Stats(StatsPanel),
    Clustering(ClusterPanel),
}

impl PageBody {
    fn new(id: PageId, max_size: usize) -> Self {
        match id {
            PageId::Fantasy => PageBody::Fantasy(FantasyPanel {
                squad: Selection::new(max_size),
                estimate: RequestSlot::new(),
            }),
            PageId::Performance => PageBody::Performance(PerformancePanel {
                squad: Selection::new(max_size),
                prediction: RequestSlot::new(),
            }),
            PageId::Stats => PageBody::Stats(StatsPanel::default()),
            PageId::Clustering => PageBody::Clustering(ClusterPanel::default()),
        }
    }

    fn exclusion(&self) -> &dyn ExclusionSet {
        match self {
            PageBody::Fantasy(p) => &p.squad,
            PageBody::Performance(p) => &p.squad,
            PageBody::Stats(p) => &p.pick,
            PageBody::Clustering(p) => &p.pick,
        }
    }

    pub fn squad(&self) -> Option<&Selection> {
        match self {
            PageBody::Fantasy(p) => Some(&p.squad),
            PageBody::Performance(p) => Some(&p.squad),
            PageBody::Stats(_) | PageBody::Clustering(_) => None,
        }
    }
}

impl FantasyPanel {
    /// Drop the current estimate and, if the squad is complete, ask for a
    /// fresh one. Called after every squad mutation.
    fn refresh_estimate(&mut self) -> Vec<BackendRequest> {
        self.estimate.invalidate();
        if !self.squad.is_complete() {
            return Vec::new();
        }
        let generation = self.estimate.begin();
        info!("Squad complete, requesting estimate (gen {})", generation);
        vec![BackendRequest::Estimate {
            generation,
            request: EstimateRequest::from(&self.squad),
        }]
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Page {
    id: PageId,
    universe: RequestSlot<Universe>,
    selector: Selector,
    hint: Option<String>,
    body: PageBody,
}

impl Page {
    pub fn new(id: PageId, max_size: usize) -> Self {
        Page {
            id,
            universe: RequestSlot::new(),
            selector: Selector::new(),
            hint: None,
            body: PageBody::new(id, max_size),
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn universe_status(&self) -> RequestStatus {
        self.universe.status()
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn body(&self) -> &PageBody {
        &self.body
    }

    /// The page became visible. Fetches the candidate list the first time
    /// only; a failed load is not retried.
    pub fn activate(&mut self) -> Vec<BackendRequest> {
        if self.universe.status() != RequestStatus::Idle {
            return Vec::new();
        }
        vec![self.load_request()]
    }

    fn load_request(&mut self) -> BackendRequest {
        let generation = self.universe.begin();
        match &self.body {
            PageBody::Clustering(panel) => {
                info!("Loading {} clusters", panel.mode.segment());
                BackendRequest::LoadClusters {
                    mode: panel.mode,
                    generation,
                }
            }
            _ => {
                info!("Loading player names for {:?}", self.id);
                BackendRequest::LoadUniverse {
                    page: self.id,
                    generation,
                }
            }
        }
    }

    /// Switch the clustering page between batters and bowlers.
    ///
    /// The new mode has its own universe, so the selector starts over and the
    /// cluster table is fetched again. Choosing the current mode does nothing.
    pub fn set_cluster_mode(&mut self, mode: ClusterMode) -> Vec<BackendRequest> {
        let PageBody::Clustering(panel) = &mut self.body else {
            debug!("{:?}: cluster modes are not used on this page", self.id);
            return Vec::new();
        };
        if panel.mode == mode {
            return Vec::new();
        }
        panel.mode = mode;
        panel.clusters.clear();
        panel.lookup.invalidate();
        self.selector = Selector::new();
        self.hint = None;
        self.universe.invalidate();
        vec![self.load_request()]
    }

    /// Feed one selector event. Ignored until the candidate list is loaded.
    pub fn handle_search(&mut self, key: SearchKey) -> Vec<BackendRequest> {
        let Some(universe) = self.universe.value() else {
            debug!("{:?}: ignoring {:?} before player names are loaded", self.id, key);
            return Vec::new();
        };

        match key {
            SearchKey::Focus => {
                self.selector.focus();
                Vec::new()
            }
            SearchKey::Insert(c) => {
                self.hint = None;
                self.selector.insert_char(c);
                Vec::new()
            }
            SearchKey::Backspace => {
                self.hint = None;
                self.selector.backspace();
                Vec::new()
            }
            SearchKey::Up => {
                self.selector.move_up();
                Vec::new()
            }
            SearchKey::Down => {
                self.selector.move_down(universe, self.body.exclusion());
                Vec::new()
            }
            SearchKey::Enter => commit(
                &mut self.selector,
                &mut self.body,
                &mut self.hint,
                universe,
                None,
            ),
            SearchKey::Pick(name) => commit(
                &mut self.selector,
                &mut self.body,
                &mut self.hint,
                universe,
                Some(&name),
            ),
            SearchKey::Blur => {
                let exclusion = self.body.exclusion();
                let mut hint = None;
                self.selector.blur_with(|query| {
                    if !query.trim().is_empty() && filter(query, universe, exclusion).is_empty() {
                        hint = Some(NO_MATCH_HINT.to_string());
                    }
                });
                self.hint = hint;
                Vec::new()
            }
        }
    }

    /// Toggle a leadership role. Only the fantasy page has roles.
    pub fn toggle_role(&mut self, index: usize, role: Role) -> Vec<BackendRequest> {
        match &mut self.body {
            PageBody::Fantasy(panel) => {
                if panel.squad.set_role(index, role) {
                    panel.refresh_estimate()
                } else {
                    Vec::new()
                }
            }
            _ => {
                debug!("{:?}: roles are not used on this page", self.id);
                Vec::new()
            }
        }
    }

    pub fn remove_member(&mut self, index: usize) -> Vec<BackendRequest> {
        match &mut self.body {
            PageBody::Fantasy(panel) => {
                if let Some(member) = panel.squad.remove(index) {
                    info!("Removed {} from fantasy squad", member.name);
                    return panel.refresh_estimate();
                }
                Vec::new()
            }
            PageBody::Performance(panel) => {
                if let Some(member) = panel.squad.remove(index) {
                    info!("Removed {} from performance squad", member.name);
                    panel.prediction.invalidate();
                }
                Vec::new()
            }
            PageBody::Stats(_) | PageBody::Clustering(_) => Vec::new(),
        }
    }

    /// Ask for a performance prediction of the current squad.
    ///
    /// Refused (with an inline hint) while the squad is empty or a profile
    /// lookup is still outstanding.
    pub fn request_prediction(&mut self) -> Vec<BackendRequest> {
        let PageBody::Performance(panel) = &mut self.body else {
            return Vec::new();
        };
        if panel.squad.is_empty() {
            self.hint = Some(PREDICT_EMPTY_HINT.to_string());
            return Vec::new();
        }
        if panel.squad.members().iter().any(|m| m.profile_pending) {
            self.hint = Some(PREDICT_PENDING_HINT.to_string());
            return Vec::new();
        }
        self.hint = None;
        let generation = panel.prediction.begin();
        info!("Requesting performance prediction for {} players", panel.squad.len());
        vec![BackendRequest::Predict {
            generation,
            squad: PerformanceEntry::from_squad(&panel.squad),
        }]
    }

    /// Apply a backend completion addressed to this page.
    pub fn apply(&mut self, event: BackendEvent) {
        match (event, &mut self.body) {
            (BackendEvent::UniverseLoaded { generation, result, .. }, _) => {
                let failed = result.is_err();
                if let Err(ref e) = result {
                    warn!("{:?}: player names unavailable: {}", self.id, e);
                }
                let applied = self.universe.resolve(generation, result.map(Universe::new));
                if applied && !failed {
                    info!(
                        "{:?}: loaded {} player names",
                        self.id,
                        self.universe.value().map_or(0, Universe::len)
                    );
                }
            }
            (BackendEvent::EstimateReady { generation, result }, PageBody::Fantasy(panel)) => {
                if let Err(ref e) = result {
                    warn!("Fantasy estimate failed: {}", e);
                }
                panel.estimate.resolve(generation, result);
            }
            (BackendEvent::ProfileReady { name, result }, PageBody::Performance(panel)) => {
                let Some(member) = panel.squad.member_mut(&name) else {
                    debug!("Discarding profile for {} (no longer in squad)", name);
                    return;
                };
                if !member.profile_pending {
                    debug!("Discarding duplicate profile for {}", name);
                    return;
                }
                member.profile_pending = false;
                match result {
                    Ok(profile) => member.profile = profile,
                    Err(e) => warn!("Player info for {} unavailable: {}", name, e),
                }
            }
            (BackendEvent::PredictionReady { generation, result }, PageBody::Performance(panel)) => {
                if let Err(ref e) = result {
                    warn!("Performance prediction failed: {}", e);
                }
                panel.prediction.resolve(generation, result);
            }
            (BackendEvent::StatsReady { generation, result }, PageBody::Stats(panel)) => {
                if let Err(ref e) = result {
                    warn!("Batter stats lookup failed: {}", e);
                }
                panel.stats.resolve(generation, result);
            }
            (
                BackendEvent::ClustersLoaded {
                    mode,
                    generation,
                    result,
                },
                PageBody::Clustering(panel),
            ) => {
                if mode != panel.mode {
                    debug!("Discarding {} clusters (mode switched)", mode.segment());
                    return;
                }
                let names = match &result {
                    Ok(clusters) => Ok(Universe::new(cluster_members(clusters))),
                    Err(e) => {
                        warn!("{} clusters unavailable: {}", mode.label(), e);
                        Err(e.clone())
                    }
                };
                if self.universe.resolve(generation, names) {
                    if let Ok(clusters) = result {
                        info!(
                            "Loaded {} {} clusters ({} players)",
                            clusters.len(),
                            mode.segment(),
                            self.universe.value().map_or(0, Universe::len)
                        );
                        panel.clusters = clusters;
                    }
                }
            }
            (BackendEvent::ClusterReady { generation, result }, PageBody::Clustering(panel)) => {
                if let Err(ref e) = result {
                    warn!("Cluster lookup failed: {}", e);
                }
                panel.lookup.resolve(generation, result);
            }
            (event, _) => {
                warn!("{:?}: ignoring event for another page: {:?}", self.id, event);
            }
        }
    }

    /// The inline error for this page, if any. A failed list load outranks
    /// everything else.
    pub fn error(&self) -> Option<PanelError> {
        if self.universe.status() == RequestStatus::Failed {
            let error = match self.body {
                PageBody::Clustering(_) => PanelError::clusters_unavailable(),
                _ => PanelError::load_failed(),
            };
            return Some(error.with_detail(self.universe.error()));
        }
        match &self.body {
            PageBody::Fantasy(p) if p.estimate.status() == RequestStatus::Failed => {
                Some(PanelError::estimate_failed().with_detail(p.estimate.error()))
            }
            PageBody::Performance(p) if p.prediction.status() == RequestStatus::Failed => {
                Some(PanelError::predict_failed().with_detail(p.prediction.error()))
            }
            PageBody::Stats(p) if p.stats.status() == RequestStatus::Failed => {
                Some(PanelError::lookup_failed().with_detail(p.stats.error()))
            }
            PageBody::Clustering(p) if p.lookup.status() == RequestStatus::Failed => {
                Some(PanelError::cluster_lookup_failed().with_detail(p.lookup.error()))
            }
            _ => None,
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let universe = self.universe.value().unwrap_or(Universe::EMPTY);
        let exclusion = self.body.exclusion();
        let rows: Vec<SuggestionRow> = self
            .selector
            .rows(universe, exclusion)
            .into_iter()
            .map(|h| SuggestionRow {
                name: h.text.to_string(),
                matched_prefix_len: h.matched_prefix_len,
            })
            .collect();
        let cursor = self.selector.cursor().min(rows.len().saturating_sub(1));

        let (squad, max_size, complete) = match self.body.squad() {
            Some(s) => (
                s.members()
                    .iter()
                    .map(|m| MemberRow {
                        name: m.name.clone(),
                        tag: m.tag(),
                        role: m.profile.role.clone(),
                        team: m.profile.team.clone(),
                        profile_pending: m.profile_pending,
                    })
                    .collect(),
                s.max_size(),
                s.is_complete(),
            ),
            None => (Vec::new(), 0, false),
        };

        let results = match &self.body {
            PageBody::Fantasy(p) => ResultsSnapshot::Fantasy {
                status: p.estimate.status(),
                estimate: p.estimate.value().cloned(),
            },
            PageBody::Performance(p) => ResultsSnapshot::Performance {
                status: p.prediction.status(),
                prediction: p.prediction.value().cloned(),
            },
            PageBody::Stats(p) => ResultsSnapshot::Stats {
                status: p.stats.status(),
                stats: p.stats.value().cloned(),
            },
            PageBody::Clustering(p) => ResultsSnapshot::Clustering {
                mode: p.mode,
                status: p.lookup.status(),
                player: p.lookup.value().cloned(),
                clusters: p.clusters.clone(),
            },
        };

        PageSnapshot {
            id: self.id,
            universe: self.universe.status(),
            universe_size: universe.len(),
            search: SearchSnapshot {
                query: self.selector.query().to_string(),
                open: self.selector.is_open(),
                rows,
                cursor,
                hint: self.hint.clone(),
            },
            squad,
            max_size,
            complete,
            results,
            error: self.error(),
        }
    }
}

/// Commit the cursor row (`pick == None`) or a pointer-picked row into the
/// page's sink, returning any follow-up backend work.
fn commit(
    selector: &mut Selector,
    body: &mut PageBody,
    hint: &mut Option<String>,
    universe: &Universe,
    pick: Option<&str>,
) -> Vec<BackendRequest> {
    match body {
        PageBody::Fantasy(panel) => {
            let outcome = match pick {
                Some(name) => selector.commit_candidate(universe, name, &mut panel.squad),
                None => selector.commit_highlighted(universe, &mut panel.squad),
            };
            match outcome {
                CommitOutcome::Committed(name) => {
                    *hint = None;
                    info!("Added {} to fantasy squad", name);
                    panel.refresh_estimate()
                }
                CommitOutcome::Rejected { candidate, reason } => {
                    info!("Rejected {}: {}", candidate, reason);
                    *hint = Some(reason.to_string());
                    Vec::new()
                }
                CommitOutcome::Nothing => Vec::new(),
            }
        }
        PageBody::Performance(panel) => {
            let outcome = match pick {
                Some(name) => selector.commit_candidate(universe, name, &mut panel.squad),
                None => selector.commit_highlighted(universe, &mut panel.squad),
            };
            match outcome {
                CommitOutcome::Committed(name) => {
                    *hint = None;
                    info!("Added {} to performance squad", name);
                    panel.prediction.invalidate();
                    if let Some(member) = panel.squad.member_mut(&name) {
                        member.profile_pending = true;
                    }
                    vec![BackendRequest::Profile { name }]
                }
                CommitOutcome::Rejected { candidate, reason } => {
                    info!("Rejected {}: {}", candidate, reason);
                    *hint = Some(reason.to_string());
                    Vec::new()
                }
                CommitOutcome::Nothing => Vec::new(),
            }
        }
        PageBody::Stats(panel) => {
            let outcome = match pick {
                Some(name) => selector.commit_candidate(universe, name, &mut panel.pick),
                None => selector.commit_highlighted(universe, &mut panel.pick),
            };
            match outcome {
                CommitOutcome::Committed(name) => {
                    *hint = None;
                    let generation = panel.stats.begin();
                    info!("Looking up stats for {} (gen {})", name, generation);
                    vec![BackendRequest::Stats { generation, name }]
                }
                CommitOutcome::Rejected { reason, .. } => match reason {},
                CommitOutcome::Nothing => Vec::new(),
            }
        }
        PageBody::Clustering(panel) => {
            let outcome = match pick {
                Some(name) => selector.commit_candidate(universe, name, &mut panel.pick),
                None => selector.commit_highlighted(universe, &mut panel.pick),
            };
            match outcome {
                CommitOutcome::Committed(name) => {
                    *hint = None;
                    let generation = panel.lookup.begin();
                    info!(
                        "Looking up {} cluster for {} (gen {})",
                        panel.mode.segment(),
                        name,
                        generation
                    );
                    vec![BackendRequest::ClusterLookup {
                        mode: panel.mode,
                        generation,
                        name,
                    }]
                }
                CommitOutcome::Rejected { reason, .. } => match reason {},
                CommitOutcome::Nothing => Vec::new(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
