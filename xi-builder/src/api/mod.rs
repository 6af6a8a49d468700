// Prediction backend access.
//
// The app talks to the backend only through the `Backend` trait so tests can
// swap in a scripted implementation. `HttpBackend` is the real one;
// `OfflineUniverse` wraps any backend and serves the fantasy player list from
// local CSV files.

pub mod client;
pub mod offline;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

use crate::protocol::PageId;

pub use client::HttpBackend;
pub use offline::OfflineUniverse;
pub use types::{
    cluster_members, BatterStats, Cluster, ClusterMode, EstimatePlayer, EstimateRequest,
    FantasyEstimate, PerformanceEntry, PerformancePrediction, PlayerCluster, PlayerPoints,
    PlayerPrediction, TeamSummary,
};

use crate::squad::PlayerProfile;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid backend URL {0:?}")]
    InvalidBaseUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned status {0}")]
    Status(u16),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("{0}")]
    Unavailable(String),
}

/// Everything the pages ask of the prediction service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// The candidate names for a page's selector.
    async fn fetch_universe(&self, page: PageId) -> Result<Vec<String>, ApiError>;

    async fn estimate(&self, request: &EstimateRequest) -> Result<FantasyEstimate, ApiError>;

    async fn player_profile(&self, name: &str) -> Result<PlayerProfile, ApiError>;

    async fn predict_performance(
        &self,
        squad: &[PerformanceEntry],
    ) -> Result<PerformancePrediction, ApiError>;

    async fn batter_stats(&self, name: &str) -> Result<BatterStats, ApiError>;

    /// The cluster table for one mode.
    async fn clusters(&self, mode: ClusterMode) -> Result<Vec<Cluster>, ApiError>;

    async fn player_cluster(&self, mode: ClusterMode, name: &str)
        -> Result<PlayerCluster, ApiError>;
}
