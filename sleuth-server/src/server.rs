//! Server lifecycle -- config load, startup sequence, graceful shutdown.
//!
//! # Startup Order
//!
//! 1. Load config (missing file -> defaults, env overrides applied)
//! 2. Apply CLI overrides and re-validate
//! 3. `--validate` exits here
//! 4. Initialize tracing
//! 5. Install Prometheus recorder (when enabled)
//! 6. Write PID file (when configured)
//! 7. Bind the listener and serve until SIGTERM/SIGINT
//!
//! Shutdown drains in-flight connections (axum graceful shutdown) and
//! removes the PID file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use sleuth_core::config::SleuthConfig;
use sleuth_lookup::LookupService;

use crate::cli::ServerCli;
use crate::logging;
use crate::metrics_server;
use crate::routes;
use crate::state::AppState;

/// Run the server to completion.
///
/// Blocks until a shutdown signal is received and the last in-flight
/// connection has drained.
///
/// # Errors
///
/// Returns an error if configuration loading/validation fails, tracing
/// or metrics initialization fails, the PID file cannot be written, or
/// the listener cannot bind.
pub async fn run(cli: ServerCli) -> Result<()> {
    let mut config = SleuthConfig::load_or_default(&cli.config)
        .await
        .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;

    // CLI overrides take precedence over file and environment
    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.general.log_format = format.clone();
    }
    if let Some(pid_file) = &cli.pid_file {
        config.general.pid_file = pid_file.clone();
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

    if cli.validate {
        println!("configuration OK: {}", cli.config.display());
        return Ok(());
    }

    logging::init_tracing(&config.general)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "sleuth-server starting"
    );

    // Install metrics recorder before any request can record
    if config.metrics.enabled {
        metrics_server::install_metrics_recorder(&config.metrics)?;
        tracing::info!(port = config.metrics.port, "metrics endpoint enabled");
    }

    let service = LookupService::from_config(&config.scanner);
    tracing::info!(
        executable = %config.scanner.executable,
        timeout_secs = config.scanner.timeout_secs,
        "lookup service initialized"
    );

    let state = Arc::new(AppState::new(service));
    let router = routes::build_router(Arc::clone(&state));

    // Write PID file if configured
    let pid_path = if config.general.pid_file.is_empty() {
        None
    } else {
        Some(PathBuf::from(&config.general.pid_file))
    };
    if let Some(path) = &pid_path {
        write_pid_file(path)?;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server listen address: {}", e))?;

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            // Cleanup PID file on startup failure
            if let Some(path) = &pid_path {
                remove_pid_file(path);
            }
            return Err(anyhow::anyhow!("failed to bind {}: {}", addr, e));
        }
    };

    tracing::info!(listen_addr = %addr, "HTTP API listening");
    tracing::info!("username lookups available at: http://{addr}/lookup/{{username}}");
    tracing::info!("status endpoint: http://{addr}/status");
    tracing::info!("health check: http://{addr}/health");

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(signal) => tracing::info!(signal = signal, "shutdown signal received"),
            Err(e) => tracing::error!(error = %e, "failed to listen for shutdown signals"),
        }
        signal_token.cancel();
    });

    let serve_result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await;

    // Remove PID file regardless of how serving ended
    if let Some(path) = &pid_path {
        remove_pid_file(path);
    }

    serve_result.map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    tracing::info!("sleuth-server shut down");
    Ok(())
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Returns the name of the signal that triggered the shutdown.
///
/// # Errors
///
/// Returns an error if signal handlers cannot be installed.
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Write the current process PID to a file.
///
/// Used to prevent duplicate server instances.
///
/// # Security
///
/// - Uses `create_new(true)` to atomically create file (prevents TOCTOU races)
/// - Verifies the created file is a regular file (prevents symlink attacks)
/// - Creates parent directory with restrictive permissions (0o700)
///
/// # Errors
///
/// Returns an error if the PID file cannot be written.
fn write_pid_file(path: &Path) -> Result<()> {
    use std::fs::{self, OpenOptions};
    use std::io::{ErrorKind, Write};

    // Create parent directory with restrictive permissions (0o700)
    if let Some(parent) = path.parent() {
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            let mut builder = fs::DirBuilder::new();
            builder.mode(0o700).recursive(true);
            builder.create(parent)?;
        }
        #[cfg(not(unix))]
        {
            fs::create_dir_all(parent)?;
        }
    }

    let pid = std::process::id();

    // Atomically create file only if it doesn't exist (eliminates TOCTOU race)
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            // File already exists, read the existing PID for error message
            let existing_pid = fs::read_to_string(path).unwrap_or_else(|_| "unknown".to_string());
            return Err(anyhow::anyhow!(
                "PID file {} already exists with PID: {}. Is another instance running?",
                path.display(),
                existing_pid.trim()
            ));
        }
        Err(e) => return Err(e.into()),
    };

    // Verify the created file is a regular file (not a symlink or other special file)
    let metadata = file.metadata()?;
    if !metadata.is_file() {
        // Remove the non-regular file and return error
        let _ = fs::remove_file(path);
        return Err(anyhow::anyhow!(
            "PID file {} is not a regular file (possible symlink attack)",
            path.display()
        ));
    }

    // Set restrictive permissions on the PID file (0o600)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        file.set_permissions(permissions)?;
    }

    writeln!(file, "{}", pid)?;

    tracing::info!(pid = pid, path = %path.display(), "PID file written");
    Ok(())
}

/// Remove the PID file on server shutdown.
///
/// Logs a warning but does not fail if the file cannot be removed.
fn remove_pid_file(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "failed to remove PID file"
        );
    } else {
        tracing::info!(path = %path.display(), "PID file removed");
    }
}
