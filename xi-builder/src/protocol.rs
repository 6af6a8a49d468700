// Message types exchanged between the TUI, the app orchestrator, and the
// spawned backend tasks.
//
// TUI -> app: `UserCommand`
// app -> backend task: `BackendRequest`
// backend task -> app: `BackendEvent`
// app -> TUI: `UiUpdate`

use serde::Serialize;

use crate::api::{
    BatterStats, Cluster, ClusterMode, EstimateRequest, FantasyEstimate, PerformanceEntry,
    PerformancePrediction, PlayerCluster,
};
use crate::request::RequestStatus;
use crate::squad::{PlayerProfile, Role};

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PageId {
    Fantasy,
    Performance,
    Stats,
    Clustering,
}

impl PageId {
    pub const ALL: [PageId; 4] = [
        PageId::Fantasy,
        PageId::Performance,
        PageId::Stats,
        PageId::Clustering,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PageId::Fantasy => "Fantasy XI",
            PageId::Performance => "Performance",
            PageId::Stats => "Batter Stats",
            PageId::Clustering => "Clusters",
        }
    }

    pub fn index(self) -> usize {
        match self {
            PageId::Fantasy => 0,
            PageId::Performance => 1,
            PageId::Stats => 2,
            PageId::Clustering => 3,
        }
    }

    /// Pages that build a squad; the others are single-pick lookups.
    pub fn has_squad(self) -> bool {
        matches!(self, PageId::Fantasy | PageId::Performance)
    }
}

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

/// A discrete selector event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKey {
    Focus,
    Insert(char),
    Backspace,
    Up,
    Down,
    Enter,
    /// A suggestion row chosen with the pointer.
    Pick(String),
    Blur,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    SwitchTab(PageId),
    Search(SearchKey),
    ToggleRole { index: usize, role: Role },
    RemoveMember(usize),
    Predict,
    SetClusterMode(ClusterMode),
    Quit,
}

// ---------------------------------------------------------------------------
// app <-> backend tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendRequest {
    LoadUniverse { page: PageId, generation: u64 },
    Estimate { generation: u64, request: EstimateRequest },
    Profile { name: String },
    Predict { generation: u64, squad: Vec<PerformanceEntry> },
    Stats { generation: u64, name: String },
    LoadClusters { mode: ClusterMode, generation: u64 },
    ClusterLookup { mode: ClusterMode, generation: u64, name: String },
}

/// Completion of a `BackendRequest`. Errors are already rendered to strings;
/// the page decides what to show.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    UniverseLoaded {
        page: PageId,
        generation: u64,
        result: Result<Vec<String>, String>,
    },
    EstimateReady {
        generation: u64,
        result: Result<FantasyEstimate, String>,
    },
    ProfileReady {
        name: String,
        result: Result<PlayerProfile, String>,
    },
    PredictionReady {
        generation: u64,
        result: Result<PerformancePrediction, String>,
    },
    StatsReady {
        generation: u64,
        result: Result<BatterStats, String>,
    },
    ClustersLoaded {
        mode: ClusterMode,
        generation: u64,
        result: Result<Vec<Cluster>, String>,
    },
    ClusterReady {
        generation: u64,
        result: Result<PlayerCluster, String>,
    },
}

impl BackendEvent {
    /// The page this event belongs to.
    pub fn page(&self) -> PageId {
        match self {
            BackendEvent::UniverseLoaded { page, .. } => *page,
            BackendEvent::EstimateReady { .. } => PageId::Fantasy,
            BackendEvent::ProfileReady { .. } | BackendEvent::PredictionReady { .. } => {
                PageId::Performance
            }
            BackendEvent::StatsReady { .. } => PageId::Stats,
            BackendEvent::ClustersLoaded { .. } | BackendEvent::ClusterReady { .. } => {
                PageId::Clustering
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Panel errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// The candidate list could not be fetched. Terminal for the page.
    LoadFailed,
    /// A single-player query failed. Earlier results stay on screen.
    LookupFailed,
    /// A squad computation failed. The squad is untouched.
    EstimateFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelError {
    pub kind: ErrorKind,
    pub message: String,
    /// The underlying failure, e.g. "backend returned status 404".
    pub detail: Option<String>,
}

impl PanelError {
    fn new(kind: ErrorKind, message: &str) -> Self {
        PanelError {
            kind,
            message: message.to_string(),
            detail: None,
        }
    }

    pub fn load_failed() -> Self {
        Self::new(ErrorKind::LoadFailed, "Could not load player names")
    }

    pub fn clusters_unavailable() -> Self {
        Self::new(ErrorKind::LoadFailed, "Failed to load clusters")
    }

    pub fn estimate_failed() -> Self {
        Self::new(
            ErrorKind::EstimateFailed,
            "Could not estimate fantasy points. Try again.",
        )
    }

    pub fn predict_failed() -> Self {
        Self::new(ErrorKind::EstimateFailed, "Could not predict performance")
    }

    pub fn lookup_failed() -> Self {
        Self::new(ErrorKind::LookupFailed, "Failed to fetch player stats")
    }

    pub fn cluster_lookup_failed() -> Self {
        Self::new(ErrorKind::LookupFailed, "Player not found in clusters")
    }

    pub fn with_detail(mut self, detail: Option<&str>) -> Self {
        self.detail = detail.map(str::to_string);
        self
    }
}

// ---------------------------------------------------------------------------
// app -> TUI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Snapshot(Box<AppSnapshot>),
}

/// Everything the TUI needs to draw the active page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSnapshot {
    pub active: PageId,
    pub page: PageSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub id: PageId,
    /// Status of the candidate list load.
    pub universe: RequestStatus,
    pub universe_size: usize,
    pub search: SearchSnapshot,
    /// Empty on the lookup pages.
    pub squad: Vec<MemberRow>,
    pub max_size: usize,
    pub complete: bool,
    pub results: ResultsSnapshot,
    pub error: Option<PanelError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub open: bool,
    pub rows: Vec<SuggestionRow>,
    pub cursor: usize,
    /// Inline message under the input (rejections, "No players found").
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionRow {
    pub name: String,
    /// Byte length of the emphasized prefix; 0 for none.
    pub matched_prefix_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRow {
    pub name: String,
    /// "C", "VC", or "".
    pub tag: &'static str,
    pub role: String,
    pub team: String,
    pub profile_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResultsSnapshot {
    Fantasy {
        status: RequestStatus,
        estimate: Option<FantasyEstimate>,
    },
    Performance {
        status: RequestStatus,
        prediction: Option<PerformancePrediction>,
    },
    Stats {
        status: RequestStatus,
        stats: Option<BatterStats>,
    },
    Clustering {
        mode: ClusterMode,
        /// Status of the per-player lookup.
        status: RequestStatus,
        player: Option<PlayerCluster>,
        clusters: Vec<Cluster>,
    },
}
