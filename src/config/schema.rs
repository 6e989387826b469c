//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the node.
//! All types derive Serde traits so an optional TOML file can seed them before
//! the environment overlay is applied.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default identifier shared by every inbound of the proxy core.
pub const DEFAULT_UUID: &str = "9afd1229-b893-40c1-84dd-51e7ce204913";

/// Root configuration for the node.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    /// Local HTTP server (health and subscription routes).
    pub server: ServerConfig,

    /// Working directory for binaries and generated files.
    pub workspace: WorkspaceConfig,

    /// Proxy core identity.
    pub proxy: ProxyCoreConfig,

    /// Monitoring agent connection settings.
    pub agent: AgentConfig,

    /// Tunnel client settings.
    pub tunnel: TunnelConfig,

    /// Subscription link parameters.
    pub subscription: SubscriptionConfig,

    /// Control endpoint for node registration.
    pub control: ControlConfig,

    /// Where executables are downloaded from.
    pub artifacts: ArtifactConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the HTTP server binds on all interfaces.
    pub port: u16,

    /// Path segment serving the subscription (without leading slash).
    pub subscription_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            subscription_path: "sub".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub path: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./tmp"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProxyCoreConfig {
    /// Client id (vless/vmess) and password (trojan).
    pub uuid: String,
}

impl Default for ProxyCoreConfig {
    fn default() -> Self {
        Self {
            uuid: DEFAULT_UUID.to_string(),
        }
    }
}

/// Monitoring agent settings. The agent only runs when both `server` and
/// `key` are present.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// Dashboard address, `host` or `host:port`.
    pub server: Option<String>,

    /// Dashboard port. Its presence selects the legacy (v0) agent.
    pub port: Option<String>,

    /// Agent secret.
    pub key: Option<String>,
}

impl AgentConfig {
    /// Server and key, when the agent is configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.server.as_deref(), self.key.as_deref()) {
            (Some(server), Some(key)) => Some((server, key)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TunnelConfig {
    /// Fixed public hostname of the tunnel.
    pub domain: Option<String>,

    /// Tunnel token or credentials JSON.
    pub auth: Option<String>,

    /// Local port the tunnel forwards to; also the external proxy inbound.
    pub port: u16,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            domain: None,
            auth: None,
            port: 8001,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SubscriptionConfig {
    /// Display name attached to every link.
    pub name: String,

    /// CDN host clients connect to.
    pub cdn_host: String,

    /// CDN port clients connect to.
    pub cdn_port: u16,

    /// Public URL of this node's HTTP server, used to publish a
    /// subscription URL instead of individual nodes.
    pub project_url: Option<String>,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            name: "Vls".to_string(),
            cdn_host: "www.visa.com.sg".to_string(),
            cdn_port: 443,
            project_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ControlConfig {
    /// Base URL of the control endpoint.
    pub url: Option<String>,

    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Download URL with `{arch}` and `{file}` placeholders.
    pub url_template: String,

    /// Total timeout for a single download.
    pub timeout_secs: u64,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            url_template: "https://{arch}.ssss.nyc.mn/{file}".to_string(),
            timeout_secs: 120,
        }
    }
}
