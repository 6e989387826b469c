//! Control endpoint integration.
//!
//! # Data Flow
//! ```text
//! Startup (before cleanup):
//!     sub.txt → base64 decode → node URIs → POST /api/delete-nodes
//!
//! After the subscription is generated:
//!     project URL set → POST /api/add-subscriptions
//!     otherwise       → POST /api/add-nodes
//! ```
//!
//! # Design Decisions
//! - Every call is best-effort: errors are logged and swallowed by callers
//! - No request is issued when there is nothing to send

pub mod client;
pub mod nodes;

pub use client::{ControlClient, ControlError};
pub use nodes::{decode_subscription, extract_nodes};

use crate::config::NodeConfig;
use crate::workspace::Workspace;

/// Ask the control endpoint to forget the nodes published by the previous run.
///
/// Returns the number of nodes submitted. A missing control URL, a missing
/// `sub.txt` or an empty node list is a no-op.
pub async fn deregister_previous(config: &NodeConfig, workspace: &Workspace) -> usize {
    let Some(client) = ControlClient::from_config(config) else {
        return 0;
    };

    let path = workspace.subscription();
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return 0,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read previous subscription");
            return 0;
        }
    };

    let nodes = extract_nodes(&decode_subscription(&content));
    if nodes.is_empty() {
        return 0;
    }

    let count = nodes.len();
    match client.delete_nodes(&nodes).await {
        Ok(()) => {
            tracing::info!(count, "Previous nodes deregistered");
            count
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to deregister previous nodes");
            0
        }
    }
}

/// Publish the freshly generated nodes. Best-effort.
pub async fn publish(config: &NodeConfig, links: &[String]) {
    let Some(client) = ControlClient::from_config(config) else {
        return;
    };

    let result = match config.subscription.project_url.as_deref() {
        Some(project_url) => {
            let url = format!(
                "{}/{}",
                project_url.trim_end_matches('/'),
                config.server.subscription_path
            );
            client.add_subscription(&url).await
        }
        None => {
            let nodes = extract_nodes(&links.join("\n"));
            if nodes.is_empty() {
                return;
            }
            client.add_nodes(&nodes).await
        }
    };

    match result {
        Ok(()) => tracing::info!("Nodes published to control endpoint"),
        Err(e) => tracing::error!(error = %e, "Failed to publish nodes"),
    }
}
