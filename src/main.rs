//! node-bootstrap
//!
//! # Startup sequence
//!
//! ```text
//!   environment (+ optional TOML file)
//!          │
//!          ▼
//!   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!   │  workspace   │──▶│  deregister  │──▶│   cleanup    │
//!   └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                                │
//!   ┌──────────────┐   ┌──────────────┐   ┌──────▼───────┐
//!   │   launch     │◀──│ fetch (join) │◀──│ write configs│
//!   │  (detached)  │   └──────────────┘   └──────────────┘
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐   ┌─────────────────────────────┐
//!   │ HTTP server  │   │ subscription (background)   │
//!   │  GET /       │   │ domain → links → publish    │
//!   └──────────────┘   └─────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use node_bootstrap::config::{self, NodeConfig};
use node_bootstrap::control;
use node_bootstrap::lifecycle::{self, signals, Shutdown};
use node_bootstrap::observability;
use node_bootstrap::workspace::Workspace;

#[derive(Parser)]
#[command(name = "node-bootstrap")]
#[command(about = "Provision and launch an ephemeral proxy node", long_about = None)]
struct Cli {
    /// TOML file read before the environment overlay
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision, launch and serve (default)
    Run,
    /// Write the configuration files into the workspace and exit
    Render,
    /// Deregister the nodes of the previous run and exit
    Deregister,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    let cli = Cli::parse();
    let config = config::loader::load(cli.config.as_deref())?;

    tracing::info!(
        workspace = %config.workspace.path.display(),
        port = config.server.port,
        tunnel_port = config.tunnel.port,
        control = config.control.url.is_some(),
        agent = config.agent.credentials().is_some(),
        "Configuration loaded"
    );

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => serve(config).await?,
        Commands::Render => {
            let workspace = Workspace::prepare(&config.workspace.path)?;
            let mode = lifecycle::write_configs(&config, &workspace)?;
            tracing::info!(path = %workspace.root().display(), tunnel_mode = ?mode, "Configuration written");
        }
        Commands::Deregister => {
            let workspace = Workspace::prepare(&config.workspace.path)?;
            let count = control::deregister_previous(&config, &workspace).await;
            tracing::info!(count, "Deregistration finished");
        }
    }

    Ok(())
}

async fn serve(config: NodeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(("0.0.0.0", config.server.port)).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    lifecycle::run(Arc::new(config), listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
