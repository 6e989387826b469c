//! Subscription generation.
//!
//! # Data Flow
//! ```text
//! tunnel mode + config
//!     → domain.rs (fixed domain, or poll boot.log for the temporary one)
//!     → links.rs  (vless / vmess / trojan URIs)
//!     → list.txt (plain) + sub.txt (base64)
//!     → SubscriptionStore (served on /<sub_path>)
//!     → control::publish
//! ```

pub mod domain;
pub mod links;

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::NodeConfig;
use crate::control;
use crate::launch::TunnelMode;
use crate::render::{write_file, RenderError};
use crate::workspace::Workspace;

pub use domain::{extract_temporary_domain, resolve_domain, DomainPoll};
pub use links::build_links;

/// Holds the base64 subscription once it exists.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionStore {
    inner: Arc<ArcSwapOption<String>>,
}

impl SubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<String>> {
        self.inner.load_full()
    }

    pub fn set(&self, encoded: String) {
        self.inner.store(Some(Arc::new(encoded)));
    }
}

/// Encode links as a subscription document.
pub fn encode(links: &[String]) -> String {
    STANDARD.encode(links.join("\n"))
}

/// Write `list.txt` and `sub.txt` and return the encoded document.
pub fn write_outputs(workspace: &Workspace, links: &[String]) -> Result<String, RenderError> {
    let plain = links.join("\n");
    let encoded = encode(links);
    write_file(&workspace.node_list(), &plain)?;
    write_file(&workspace.subscription(), &encoded)?;
    Ok(encoded)
}

/// Resolve the public domain, generate the subscription, store it and
/// publish it. Every failure is logged; nothing is returned to the caller.
pub async fn generate(
    config: Arc<NodeConfig>,
    workspace: Workspace,
    mode: TunnelMode,
    store: SubscriptionStore,
    poll: DomainPoll,
) {
    let Some(domain) = resolve_domain(&config, &workspace, mode, poll).await else {
        tracing::warn!("No public tunnel domain available, subscription not generated");
        return;
    };
    tracing::info!(domain = %domain, "Tunnel domain resolved");

    let links = build_links(&config, &domain);
    match write_outputs(&workspace, &links) {
        Ok(encoded) => {
            store.set(encoded);
            tracing::info!(path = %workspace.subscription().display(), "Subscription saved");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to write subscription");
            return;
        }
    }

    control::publish(&config, &links).await;
}
