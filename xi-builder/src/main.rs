// XI builder entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the backend (HTTP, optionally with offline name lists)
// 4. Create mpsc channels
// 5. Spawn app logic task
// 6. Run the TUI until the user quits
// 7. Cleanup on exit

use std::sync::Arc;

use xi_builder::api::{Backend, HttpBackend, OfflineUniverse};
use xi_builder::app;
use xi_builder::config;
use xi_builder::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("XI builder starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: backend={}, squad size {}",
        config.backend.base_url, config.squad.max_size
    );

    let http = HttpBackend::from_config(&config).context("failed to build HTTP client")?;
    let backend: Arc<dyn Backend> = if config.universe.offline_csv.is_empty() {
        Arc::new(http)
    } else {
        info!(
            "Fantasy player names served from {} CSV file(s)",
            config.universe.offline_csv.len()
        );
        Arc::new(OfflineUniverse::new(
            config.universe.offline_csv.clone(),
            Arc::new(http),
        ))
    };

    let (backend_tx, backend_rx) = mpsc::channel(256);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = app::AppState::new(config, backend, backend_tx);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, backend_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    info!("Application ready");

    // Blocks until the user confirms quit or presses Ctrl+C.
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("XI builder shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("xi-builder.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("xi_builder=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
