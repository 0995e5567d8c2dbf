//! oicpd - OICP endpoint daemon
//!
//! Usage:
//!   oicpd [--config oicpd.toml] [--listen 0.0.0.0:9200] [--role cpo|emp]
//!
//! Without a config file the daemon runs a CPO endpoint with no simulated
//! EVSEs, answering every remote command with `022`.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use oicp_client::CancellationToken;
use oicpd::config::{DaemonConfig, Role};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "oicpd")]
#[command(author, version, about = "OICP endpoint daemon")]
struct Args {
    /// Daemon config file (TOML)
    #[arg(short, long, env = "OICPD_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides `server.listen`
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Served role, overrides `server.role`
    #[arg(short, long, value_enum)]
    role: Option<Role>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oicpd=info,oicp_server=info,oicp_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading config from: {}", path.display());
            DaemonConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => {
            tracing::info!("No config file provided, using defaults");
            DaemonConfig::default()
        }
    };
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(role) = args.role {
        config.server.role = role;
    }

    tracing::info!(role = %config.server.role, "Starting oicpd");

    let shutdown = CancellationToken::new();
    let app = oicpd::build(&config, &shutdown)?;

    let listener = tokio::net::TcpListener::bind(config.server.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen))?;
    tracing::info!(
        "Listening on http://{}{}",
        config.server.listen,
        config.server.path_prefix
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("oicpd stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl-C received, shutting down");
    shutdown.cancel();
}
