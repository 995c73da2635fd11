//! Command line, tracing setup, and server lifecycle.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use docgate::{ConfigSource, DEFAULT_PORT, ServiceLimits, load_lint_config};
use docgate_server::{AppState, build_router};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "docgate-server",
    version,
    about = "Local MDX syntax and markdown style validation service",
    after_help = "Examples:\n  docgate-server\n  docgate-server --port 7000 --config .markdownlint.yaml -v"
)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1", help = "Address to bind")]
    host: String,
    #[arg(long, default_value_t = DEFAULT_PORT, help = "Port to listen on")]
    port: u16,
    #[arg(long, help = "Lint ruleset (.json, .yaml or .yml); the embedded ruleset if omitted")]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 10_485_760, help = "Maximum request body size in bytes")]
    max_body_bytes: usize,
    #[arg(long, default_value_t = 30, help = "Per-request processing timeout in seconds")]
    timeout_secs: u64,
    #[arg(short, long, action = ArgAction::Count, help = "Log requests (-v) and response bodies (-vv)")]
    verbose: u8,
}

impl Cli {
    fn config_source(&self) -> ConfigSource {
        self.config
            .clone()
            .map_or(ConfigSource::Embedded, ConfigSource::File)
    }

    fn limits(&self) -> ServiceLimits {
        ServiceLimits::new(self.max_body_bytes, Duration::from_secs(self.timeout_secs))
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_lint_config(&cli.config_source()).context("Failed to load lint ruleset")?;
    let app = build_router(AppState::new(config, cli.limits()), cli.verbose);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(address = %addr, "docgate server listening");
    println!("docgate server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("docgate server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
