// Offline player list: fantasy names read from local CSV files.
//
// Each file's first column holds a player name; the header row is skipped.
// Names from all files are merged, trimmed, deduplicated and sorted. A file
// that cannot be read is logged and skipped so one bad path does not take the
// page down.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{
    ApiError, Backend, BatterStats, Cluster, ClusterMode, EstimateRequest, FantasyEstimate,
    PerformanceEntry, PerformancePrediction, PlayerCluster,
};
use crate::protocol::PageId;
use crate::squad::PlayerProfile;

#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn load_names_from_reader<R: Read>(rdr: R, names: &mut BTreeSet<String>) -> Result<(), csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(rdr);
    for result in reader.records() {
        match result {
            Ok(record) => {
                if let Some(name) = record.get(0).map(str::trim).filter(|n| !n.is_empty()) {
                    names.insert(name.to_string());
                }
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(())
}

/// Add the names from one CSV file to `names`.
pub fn load_names(path: &Path, names: &mut BTreeSet<String>) -> Result<(), UniverseError> {
    let file = std::fs::File::open(path).map_err(|e| UniverseError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_names_from_reader(file, names).map_err(|e| UniverseError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Merge every readable file into one sorted, duplicate-free list.
pub fn load_all_names(paths: &[PathBuf]) -> Vec<String> {
    let mut names = BTreeSet::new();
    for path in paths {
        if let Err(e) = load_names(path, &mut names) {
            warn!("skipping player list: {}", e);
        }
    }
    names.into_iter().collect()
}

// ---------------------------------------------------------------------------
// OfflineUniverse
// ---------------------------------------------------------------------------

/// Serves the fantasy page's names from CSV files and forwards everything
/// else to `inner`.
pub struct OfflineUniverse {
    paths: Vec<PathBuf>,
    inner: Arc<dyn Backend>,
}

impl OfflineUniverse {
    pub fn new(paths: Vec<PathBuf>, inner: Arc<dyn Backend>) -> Self {
        Self { paths, inner }
    }
}

#[async_trait]
impl Backend for OfflineUniverse {
    async fn fetch_universe(&self, page: PageId) -> Result<Vec<String>, ApiError> {
        if page != PageId::Fantasy {
            return self.inner.fetch_universe(page).await;
        }
        let paths = self.paths.clone();
        let names = tokio::task::spawn_blocking(move || load_all_names(&paths))
            .await
            .map_err(|e| ApiError::Unavailable(format!("player list loader failed: {e}")))?;
        if names.is_empty() {
            return Err(ApiError::Unavailable(
                "no player names found in offline CSV files".to_string(),
            ));
        }
        info!("Loaded {} offline player names", names.len());
        Ok(names)
    }

    async fn estimate(&self, request: &EstimateRequest) -> Result<FantasyEstimate, ApiError> {
        self.inner.estimate(request).await
    }

    async fn player_profile(&self, name: &str) -> Result<PlayerProfile, ApiError> {
        self.inner.player_profile(name).await
    }

    async fn predict_performance(
        &self,
        squad: &[PerformanceEntry],
    ) -> Result<PerformancePrediction, ApiError> {
        self.inner.predict_performance(squad).await
    }

    async fn batter_stats(&self, name: &str) -> Result<BatterStats, ApiError> {
        self.inner.batter_stats(name).await
    }

    async fn clusters(&self, mode: ClusterMode) -> Result<Vec<Cluster>, ApiError> {
        self.inner.clusters(mode).await
    }

    async fn player_cluster(
        &self,
        mode: ClusterMode,
        name: &str,
    ) -> Result<PlayerCluster, ApiError> {
        self.inner.player_cluster(mode, name).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
