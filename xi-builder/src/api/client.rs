// HTTP client for the prediction service.
//
// Every call is a single JSON request/response; nothing streams. Player names
// are appended as encoded path segments, never interpolated into the URL
// string.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::types::{cluster_members, BattersEnvelope, ClustersEnvelope, PlayersEnvelope};
use super::{
    ApiError, Backend, BatterStats, Cluster, ClusterMode, EstimateRequest, FantasyEstimate,
    PerformanceEntry, PerformancePrediction, PlayerCluster,
};
use crate::config::Config;
use crate::protocol::PageId;
use crate::squad::PlayerProfile;

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

const FANTASY_PLAYERS: &[&str] = &["api", "fantasy", "players"];
const FANTASY_ESTIMATE: &[&str] = &["api", "fantasy", "estimate"];
const PERFORMANCE_PLAYERS: &[&str] = &["api", "player-performance", "all_players"];
const PERFORMANCE_INFO: &[&str] = &["api", "player-performance", "player_info"];
const PERFORMANCE_PREDICT: &[&str] = &["api", "player-performance", "predict_player_performance"];
const STATS_BATTERS: &[&str] = &["api", "player-stats", "batters"];
const STATS_PLAYER: &[&str] = &["api", "player-stats"];

fn clustering(mode: ClusterMode) -> [&'static str; 3] {
    ["api", "clustering", mode.segment()]
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

pub struct HttpBackend {
    http: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base =
            Url::parse(base_url.trim()).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.backend.base_url,
            Duration::from_secs(config.backend.request_timeout_secs),
        )
    }

    /// Build an endpoint URL from fixed segments plus an optional trailing
    /// name, percent-encoding every segment.
    pub(crate) fn endpoint(&self, segments: &[&str], name: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
            if let Some(name) = name {
                path.push(name);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        decode(response).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), url = %response.url(), "backend returned error status");
        return Err(ApiError::Status(status.as_u16()));
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_universe(&self, page: PageId) -> Result<Vec<String>, ApiError> {
        match page {
            PageId::Fantasy => self.get_json(self.endpoint(FANTASY_PLAYERS, None)?).await,
            PageId::Performance => {
                let envelope: PlayersEnvelope =
                    self.get_json(self.endpoint(PERFORMANCE_PLAYERS, None)?).await?;
                Ok(envelope.players)
            }
            PageId::Stats => {
                let envelope: BattersEnvelope =
                    self.get_json(self.endpoint(STATS_BATTERS, None)?).await?;
                Ok(envelope.batters)
            }
            PageId::Clustering => {
                let clusters = self.clusters(ClusterMode::default()).await?;
                Ok(cluster_members(&clusters))
            }
        }
    }

    async fn estimate(&self, request: &EstimateRequest) -> Result<FantasyEstimate, ApiError> {
        self.post_json(self.endpoint(FANTASY_ESTIMATE, None)?, request)
            .await
    }

    async fn player_profile(&self, name: &str) -> Result<PlayerProfile, ApiError> {
        self.get_json(self.endpoint(PERFORMANCE_INFO, Some(name))?)
            .await
    }

    async fn predict_performance(
        &self,
        squad: &[PerformanceEntry],
    ) -> Result<PerformancePrediction, ApiError> {
        self.post_json(self.endpoint(PERFORMANCE_PREDICT, None)?, squad)
            .await
    }

    async fn batter_stats(&self, name: &str) -> Result<BatterStats, ApiError> {
        self.get_json(self.endpoint(STATS_PLAYER, Some(name))?)
            .await
    }

    async fn clusters(&self, mode: ClusterMode) -> Result<Vec<Cluster>, ApiError> {
        let envelope: ClustersEnvelope =
            self.get_json(self.endpoint(&clustering(mode), None)?).await?;
        Ok(envelope.clusters)
    }

    async fn player_cluster(
        &self,
        mode: ClusterMode,
        name: &str,
    ) -> Result<PlayerCluster, ApiError> {
        self.get_json(self.endpoint(&clustering(mode), Some(name))?)
            .await
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
