//! Startup orchestration.
//!
//! # Responsibilities
//! - Prepare the workspace and clear the previous run
//! - Write every configuration file before anything is launched
//! - Fetch binaries concurrently, then launch them detached
//! - Bind the HTTP server and start subscription generation
//!
//! # Design Decisions
//! - Fatal: workspace creation, proxy config write, HTTP server errors
//! - Everything else logs and continues; the feature simply does not start

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::artifacts::{artifact_plan, fetch_all, Architecture, FetchError, Fetcher};
use crate::config::NodeConfig;
use crate::control;
use crate::http::HttpServer;
use crate::launch::{self, agent::agent_args, spawn_detached, AgentVariant, LaunchError, Launched, TunnelMode};
use crate::lifecycle::Shutdown;
use crate::render::{self, RenderError};
use crate::subscription::{self, DomainPoll, SubscriptionStore};
use crate::workspace::{Workspace, WorkspaceError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("failed to write proxy config: {0}")]
    Render(#[from] RenderError),

    #[error("failed to build download client: {0}")]
    Fetcher(#[from] FetchError),

    #[error("HTTP server error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a bootstrap run did.
#[derive(Debug)]
pub struct BootstrapReport {
    pub workspace: Workspace,
    pub architecture: Architecture,
    /// Tunnel mode actually used, after any fallback.
    pub tunnel_mode: TunnelMode,
    pub deregistered: usize,
    pub fetched: Vec<&'static str>,
    pub failed: Vec<&'static str>,
    pub launched: Vec<Launched>,
}

/// Provision the node for the host architecture.
pub async fn bootstrap(config: &NodeConfig) -> Result<BootstrapReport, StartupError> {
    bootstrap_for(config, Architecture::detect()).await
}

/// Provision the node for `architecture`.
pub async fn bootstrap_for(
    config: &NodeConfig,
    architecture: Architecture,
) -> Result<BootstrapReport, StartupError> {
    tracing::info!(arch = %architecture, workspace = %config.workspace.path.display(), "Bootstrap starting");

    let workspace = Workspace::prepare(&config.workspace.path)?;

    // Reads sub.txt, so it must run before the cleanup removes it.
    let deregistered = control::deregister_previous(config, &workspace).await;
    workspace.cleanup_stale();

    let tunnel_mode = write_configs(config, &workspace)?;

    let fetcher = Fetcher::new(Duration::from_secs(config.artifacts.timeout_secs))?;
    let outcomes = fetch_all(&fetcher, &workspace, artifact_plan(config, architecture)).await;
    let (ok, failed): (Vec<_>, Vec<_>) = outcomes.iter().partition(|o| o.is_ok());
    let fetched = ok.iter().map(|o| o.artifact.file_name).collect();
    let failed = failed.iter().map(|o| o.artifact.file_name).collect();

    let launched = launch_all(config, &workspace, tunnel_mode);

    tracing::info!(
        tunnel_mode = ?tunnel_mode,
        launched = launched.len(),
        "Bootstrap finished"
    );

    Ok(BootstrapReport {
        workspace,
        architecture,
        tunnel_mode,
        deregistered,
        fetched,
        failed,
        launched,
    })
}

/// Write the proxy, agent and tunnel files.
///
/// Returns the tunnel mode to launch with. A credentials JSON that cannot be
/// turned into tunnel files downgrades to [`TunnelMode::Temporary`].
pub fn write_configs(config: &NodeConfig, workspace: &Workspace) -> Result<TunnelMode, StartupError> {
    let proxy = render::proxy::render(config).map_err(RenderError::from)?;
    render::write_file(&workspace.proxy_config(), &proxy)?;

    if AgentVariant::select(&config.agent) == AgentVariant::V1 {
        match render::agent::render(config) {
            Ok(Some(yaml)) => {
                if let Err(e) = render::write_file(&workspace.agent_config(), &yaml) {
                    tracing::error!(error = %e, "Failed to write agent config");
                }
            }
            Ok(None) => {}
            Err(e) => tracing::error!(error = %e, "Failed to render agent config"),
        }
    }

    let mode = TunnelMode::classify(config.tunnel.auth.as_deref());
    if mode != TunnelMode::ConfigFile {
        if mode == TunnelMode::Temporary {
            tracing::info!("No tunnel credential, using a temporary tunnel");
        }
        return Ok(mode);
    }

    match write_tunnel_files(config, workspace) {
        Ok(()) => Ok(TunnelMode::ConfigFile),
        Err(e) => {
            tracing::warn!(error = %e, "Tunnel credentials unusable, using a temporary tunnel");
            Ok(TunnelMode::Temporary)
        }
    }
}

fn write_tunnel_files(config: &NodeConfig, workspace: &Workspace) -> Result<(), RenderError> {
    let (Some(domain), Some(auth)) = (config.tunnel.domain.as_deref(), config.tunnel.auth.as_deref()) else {
        return Err(RenderError::MissingDomain);
    };

    let id = render::tunnel::tunnel_id(auth)?;
    let credentials = workspace.tunnel_credentials();
    render::write_file(&credentials, auth)?;
    let routing = render::tunnel::render_routing(&id, &credentials, domain, config.tunnel.port)?;
    render::write_file(&workspace.tunnel_routing(), &routing)?;

    tracing::info!(tunnel = %id, domain = %domain, "Tunnel files written");
    Ok(())
}

fn launch_all(config: &NodeConfig, workspace: &Workspace, tunnel_mode: TunnelMode) -> Vec<Launched> {
    let mut launched = Vec::new();

    if let Some(args) = agent_args(&config.agent, workspace) {
        let variant = AgentVariant::select(&config.agent);
        let path = workspace.file(variant.file_name());
        launched.extend(launch_one("monitoring agent", &path, &args));
    }

    launched.extend(launch_one(
        "proxy core",
        &workspace.file("web"),
        &launch::core_args(workspace),
    ));

    let tunnel_args = tunnel_mode.args(config.tunnel.auth.as_deref(), config.tunnel.port, workspace);
    launched.extend(launch_one("tunnel client", &workspace.file("bot"), &tunnel_args));

    launched
}

fn launch_one(role: &str, path: &Path, args: &[String]) -> Option<Launched> {
    match spawn_detached(path, args) {
        Ok(launched) => {
            tracing::info!(role, "Started");
            Some(launched)
        }
        Err(LaunchError::Missing(path)) => {
            tracing::error!(role, path = %path.display(), "Binary missing, cannot start");
            None
        }
        Err(e) => {
            tracing::error!(role, error = %e, "Failed to start");
            None
        }
    }
}

/// Provision the node, then serve HTTP on `listener` until `shutdown` fires.
pub async fn run(
    config: Arc<NodeConfig>,
    listener: TcpListener,
    shutdown: &Shutdown,
) -> Result<(), StartupError> {
    // Build the router first: a route that cannot be registered must fail
    // before any child is launched.
    let store = SubscriptionStore::new();
    let server = HttpServer::new(&config, store.clone());

    let report = bootstrap(&config).await?;

    tokio::spawn(subscription::generate(
        config.clone(),
        report.workspace.clone(),
        report.tunnel_mode,
        store.clone(),
        DomainPoll::default(),
    ));

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
