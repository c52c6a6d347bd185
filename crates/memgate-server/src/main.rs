mod app;

use clap::Parser;
use memgate_mcp::HttpServer;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "memgate", version, about = "Authenticated MCP gateway for the memory API")]
struct Cli {
    /// Path to the YAML configuration file (default: ./memgate.yaml if present)
    #[arg(long, short, env = "MEMGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,

    /// Validate configuration and exit
    #[arg(long, default_value_t = false)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = app::load_config(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.mcp.host = host;
    }
    if let Some(port) = cli.port {
        config.mcp.port = port;
    }

    let router = app::build_router(&config)?;
    if cli.check {
        println!("Configuration OK");
        return Ok(());
    }

    HttpServer::new(config.mcp.bind_address(), router)
        .run(shutdown_signal())
        .await?;

    tracing::info!("memgate stopped");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
