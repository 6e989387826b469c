//! Public tunnel domain resolution.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::config::NodeConfig;
use crate::launch::TunnelMode;
use crate::workspace::Workspace;

static TEMPORARY_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://([A-Za-z0-9.-]+\.trycloudflare\.com)/?").expect("valid domain pattern")
});

/// How long to wait for the temporary tunnel to log its hostname.
#[derive(Debug, Clone, Copy)]
pub struct DomainPoll {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for DomainPoll {
    fn default() -> Self {
        Self {
            attempts: 15,
            interval: Duration::from_secs(2),
        }
    }
}

/// Find the temporary tunnel hostname in tunnel client log output.
pub fn extract_temporary_domain(log: &str) -> Option<String> {
    TEMPORARY_DOMAIN
        .captures(log)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// The domain clients should connect to.
///
/// A configured domain wins unless the tunnel fell back to temporary mode, in
/// which case `boot.log` is polled.
pub async fn resolve_domain(
    config: &NodeConfig,
    workspace: &Workspace,
    mode: TunnelMode,
    poll: DomainPoll,
) -> Option<String> {
    if mode != TunnelMode::Temporary {
        return config.tunnel.domain.clone();
    }

    let log_path = workspace.boot_log();
    for attempt in 1..=poll.attempts {
        if let Ok(log) = tokio::fs::read_to_string(&log_path).await {
            if let Some(domain) = extract_temporary_domain(&log) {
                return Some(domain);
            }
        }
        tracing::debug!(attempt, "Temporary tunnel domain not logged yet");
        if attempt < poll.attempts {
            tokio::time::sleep(poll.interval).await;
        }
    }
    None
}
