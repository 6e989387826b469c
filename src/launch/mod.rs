//! Process launching subsystem.
//!
//! # Data Flow
//! ```text
//! NodeConfig + Workspace
//!     → agent.rs  (variant selection, TLS detection, arguments)
//!     → tunnel.rs (mode classification, arguments)
//!     → spawn.rs  (detached spawn, no supervision)
//! ```
//!
//! # Design Decisions
//! - Launch is fire-and-forget: children are never awaited or restarted
//! - Children get their own process group and null stdio
//! - A missing binary skips that feature instead of failing startup

pub mod agent;
pub mod spawn;
pub mod tunnel;

pub use agent::{is_tls_port, AgentVariant};
pub use spawn::{spawn_detached, LaunchError, Launched};
pub use tunnel::TunnelMode;

use crate::workspace::Workspace;

/// Arguments for the proxy core.
pub fn core_args(workspace: &Workspace) -> Vec<String> {
    vec!["-c".to_string(), workspace.proxy_config().display().to_string()]
}
