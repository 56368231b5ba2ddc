//! cap-daemon: the CAP tracker service process.
//!
//! Single OS process on a current-thread Tokio runtime. Dashboard clients
//! talk to it via newline-delimited JSON-RPC over a Unix socket in the data
//! directory.

mod commands;
mod config;
mod rpc;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cap_service::DirectorySink;
use cap_store::InventoryStore;

use crate::config::DaemonConfig;
use crate::rpc::RpcServer;

/// Daemon-wide shared state. Session state is per connection, not here.
pub struct DaemonState {
    /// Table files. Held for the duration of each request, so writes are
    /// serialized.
    pub store: Mutex<InventoryStore>,
    /// Configuration.
    pub config: DaemonConfig,
    /// Optional on-disk copy of every generated report.
    pub report_sink: Option<DirectorySink>,
}

impl DaemonState {
    pub fn new(config: DaemonConfig) -> Self {
        let store = InventoryStore::new(
            &config.data_dir(),
            &config.storage.master_file,
            &config.storage.inventory_file,
        );
        let report_sink = config.report_dir().map(DirectorySink::new);
        Self {
            store: Mutex::new(store),
            config,
            report_sink,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Load config (needed for the log level)
    let config = DaemonConfig::load()?;

    // 2. Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_directive()))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("CAP tracker daemon starting");

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;
    if config.auth.admin_secret.is_empty() {
        info!("No admin secret configured; admin writes are disabled");
    }

    // 3. Build daemon state
    let state = Arc::new(DaemonState::new(config));
    {
        let store = state.store.lock().await;
        info!(
            master = %store.master_path().display(),
            inventory = %store.inventory_path().display(),
            "Using table files"
        );
    }

    // 4. Run the RPC server until interrupted
    let socket_path = data_dir.join("daemon.sock");
    let rpc_server = RpcServer::new(state.clone(), socket_path.clone());

    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!("RPC server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    // Clean up socket file
    let _ = std::fs::remove_file(&socket_path);

    info!("Daemon stopped");
    Ok(())
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::Arc;

    use crate::config::DaemonConfig;
    use crate::DaemonState;

    pub const SECRET: &str = "test-secret";

    /// State over a fresh temp data dir with reports copied to `reports/`.
    pub fn test_state() -> (tempfile::TempDir, Arc<DaemonState>) {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut config = DaemonConfig::default();
        config.storage.data_dir = dir.path().display().to_string();
        config.auth.admin_secret = SECRET.to_string();
        config.reports.output_dir = dir.path().join("reports").display().to_string();
        (dir, Arc::new(DaemonState::new(config)))
    }
}
