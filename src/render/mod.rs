//! Configuration emitters for the external tools.
//!
//! # Data Flow
//! ```text
//! NodeConfig
//!     → proxy.rs  (proxy core JSON)          → config.json
//!     → agent.rs  (monitoring agent YAML)     → config.yaml
//!     → tunnel.rs (credentials + routing)     → tunnel.json, tunnel.yml
//! ```
//!
//! # Design Decisions
//! - Renderers are pure; writing is a separate overwrite step
//! - Output is deterministic for identical inputs
//! - No validation of the rendered documents beyond serialization

pub mod agent;
pub mod proxy;
pub mod tunnel;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("tunnel credential has no TunnelID field")]
    MissingTunnelId,

    #[error("tunnel domain is not set")]
    MissingDomain,

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Overwrite `path` with `contents`.
pub fn write_file(path: &Path, contents: &str) -> Result<(), RenderError> {
    fs::write(path, contents).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "File written");
    Ok(())
}
