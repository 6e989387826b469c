//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overlay, empty values = unset)
//!     → validation.rs (semantic checks)
//!     → NodeConfig (validated, immutable)
//!     → passed by reference to every startup step
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never mutated
//! - All fields have defaults so a bare environment still boots
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    AgentConfig, ArtifactConfig, ControlConfig, NodeConfig, ProxyCoreConfig, ServerConfig,
    SubscriptionConfig, TunnelConfig, WorkspaceConfig,
};
