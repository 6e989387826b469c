//! Bootstrap for an ephemeral proxy node.
//!
//! Writes the proxy core, monitoring agent and tunnel configuration, fetches
//! the matching executables, launches them detached and serves a health
//! route. See [`lifecycle::startup`] for the sequence.

// Core subsystems
pub mod config;
pub mod http;
pub mod workspace;

// Provisioning steps
pub mod artifacts;
pub mod control;
pub mod launch;
pub mod render;
pub mod subscription;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::NodeConfig;
pub use http::HttpServer;
pub use lifecycle::{bootstrap, BootstrapReport, Shutdown};
