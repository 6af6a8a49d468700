// Wire payloads exchanged with the prediction backend.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::squad::{Role, Selection};

// ---------------------------------------------------------------------------
// Fantasy estimate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatePlayer {
    pub name: String,
    pub captain: bool,
    pub vice_captain: bool,
}

/// Body of `POST /api/fantasy/estimate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub players: Vec<EstimatePlayer>,
}

impl From<&Selection> for EstimateRequest {
    fn from(squad: &Selection) -> Self {
        EstimateRequest {
            players: squad
                .members()
                .iter()
                .map(|m| EstimatePlayer {
                    name: m.name.clone(),
                    captain: m.has_role(Role::Captain),
                    vice_captain: m.has_role(Role::ViceCaptain),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPoints {
    pub name: String,
    pub points: i64,
    #[serde(default)]
    pub tag: Option<String>,
}

/// Response of `POST /api/fantasy/estimate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FantasyEstimate {
    pub total_points: i64,
    pub captain_bonus: i64,
    pub vice_captain_bonus: i64,
    pub rank_low: i64,
    pub rank_high: i64,
    #[serde(default)]
    pub individual_preds: Vec<PlayerPoints>,
}

impl FantasyEstimate {
    /// One-line verdict shown under the points table.
    pub fn verdict(&self) -> &'static str {
        match self.total_points {
            p if p >= 300 => "Elite! Top 1% likely.",
            p if p >= 250 => "Great! Top 5-10% likely.",
            p if p >= 200 => "Good, but can improve!",
            _ => "Try more all-rounders or different C/VC choices.",
        }
    }
}

// ---------------------------------------------------------------------------
// Performance prediction
// ---------------------------------------------------------------------------

/// One element of the `POST /api/player-performance/predict_player_performance` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub name: String,
    pub team: String,
    pub role: String,
}

impl PerformanceEntry {
    pub fn from_squad(squad: &Selection) -> Vec<PerformanceEntry> {
        squad
            .members()
            .iter()
            .map(|m| PerformanceEntry {
                name: m.name.clone(),
                team: m.profile.team.clone(),
                role: m.profile.role.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPrediction {
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub role: String,
    pub predicted_runs: i64,
    pub predicted_wickets: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub total_runs: i64,
    pub total_wickets: i64,
    #[serde(default)]
    pub best_performer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformancePrediction {
    pub predictions: Vec<PlayerPrediction>,
    pub team_summary: TeamSummary,
}

impl PerformancePrediction {
    pub fn for_player(&self, name: &str) -> Option<&PlayerPrediction> {
        self.predictions.iter().find(|p| p.name == name)
    }
}

// ---------------------------------------------------------------------------
// Batter stats
// ---------------------------------------------------------------------------

/// Response of `GET /api/player-stats/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterStats {
    pub batter: String,
    pub total_runs: i64,
    pub total_mat: i64,
    pub balls_faced: i64,
    pub strike_rate: f64,
    pub highest_run: i64,
    pub half_centuries: i64,
    pub centuries: i64,
    #[serde(default)]
    pub recent_scores: Vec<i64>,
    pub average_recent: f64,
    pub total_recent: i64,
    pub trend: String,
}

// ---------------------------------------------------------------------------
// Player clusters
// ---------------------------------------------------------------------------

/// Which cluster table the clustering page browses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterMode {
    #[default]
    Batters,
    Bowlers,
}

impl ClusterMode {
    /// Path segment under `/api/clustering/`.
    pub fn segment(self) -> &'static str {
        match self {
            ClusterMode::Batters => "batters",
            ClusterMode::Bowlers => "bowlers",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClusterMode::Batters => "Batters",
            ClusterMode::Bowlers => "Bowlers",
        }
    }

    pub fn toggled(self) -> ClusterMode {
        match self {
            ClusterMode::Batters => ClusterMode::Bowlers,
            ClusterMode::Bowlers => ClusterMode::Batters,
        }
    }
}

/// One element of `GET /api/clustering/{mode}`. Batter clusters carry the
/// strike-rate and boundary averages, bowler clusters the economy and wickets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_label: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub avg_strike_rate: Option<f64>,
    #[serde(default, rename = "avg_4s")]
    pub avg_fours: Option<f64>,
    #[serde(default, rename = "avg_6s")]
    pub avg_sixes: Option<f64>,
    #[serde(default)]
    pub avg_economy: Option<f64>,
    #[serde(default)]
    pub avg_wickets: Option<f64>,
}

/// Every cluster member once, sorted. This is the clustering page's universe.
pub fn cluster_members(clusters: &[Cluster]) -> Vec<String> {
    clusters
        .iter()
        .flat_map(|c| c.members.iter())
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Response of `GET /api/clustering/{mode}/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCluster {
    pub player: String,
    #[serde(default)]
    pub cluster: i64,
    pub cluster_label: String,
    #[serde(default)]
    pub strike_rate: Option<f64>,
    #[serde(default, rename = "4s")]
    pub fours: Option<i64>,
    #[serde(default, rename = "6s")]
    pub sixes: Option<i64>,
    #[serde(default)]
    pub economy: Option<f64>,
    #[serde(default)]
    pub wickets: Option<i64>,
}

// ---------------------------------------------------------------------------
// Universe envelopes
// ---------------------------------------------------------------------------

/// `{ "players": [...] }`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlayersEnvelope {
    pub players: Vec<String>,
}

/// `{ "batters": [...] }`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BattersEnvelope {
    pub batters: Vec<String>,
}

/// `{ "clusters": [...] }`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ClustersEnvelope {
    pub clusters: Vec<Cluster>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
