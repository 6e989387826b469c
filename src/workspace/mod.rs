//! Working directory management.
//!
//! # Data Flow
//! ```text
//! WorkspaceConfig.path
//!     → Workspace::prepare (create directory)
//!     → typed paths for every file the other steps read or write
//!     → cleanup_stale (drop binaries and outputs of the previous run)
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Files deleted before a new run. `list.txt` is kept on purpose: it is only
/// ever overwritten.
pub const STALE_FILES: [&str; 6] = ["web", "bot", "npm", "php", "sub.txt", "boot.log"];

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace {path}: {source}")]
    Create { path: PathBuf, source: io::Error },
}

/// A prepared working directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create the directory (and parents) if it does not exist yet.
    pub fn prepare(root: impl Into<PathBuf>) -> Result<Self, WorkspaceError> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root).map_err(|source| WorkspaceError::Create {
                path: root.clone(),
                source,
            })?;
            tracing::info!(path = %root.display(), "Workspace created");
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of an arbitrary file inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn proxy_config(&self) -> PathBuf {
        self.file("config.json")
    }

    pub fn agent_config(&self) -> PathBuf {
        self.file("config.yaml")
    }

    pub fn tunnel_credentials(&self) -> PathBuf {
        self.file("tunnel.json")
    }

    pub fn tunnel_routing(&self) -> PathBuf {
        self.file("tunnel.yml")
    }

    pub fn subscription(&self) -> PathBuf {
        self.file("sub.txt")
    }

    pub fn node_list(&self) -> PathBuf {
        self.file("list.txt")
    }

    pub fn boot_log(&self) -> PathBuf {
        self.file("boot.log")
    }

    /// Remove artifacts left by a previous run.
    ///
    /// Each failure is logged and skipped. Returns the names that were removed.
    pub fn cleanup_stale(&self) -> Vec<&'static str> {
        let mut removed = Vec::new();
        for name in STALE_FILES {
            let path = self.file(name);
            match fs::remove_file(&path) {
                Ok(()) => removed.push(name),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to delete stale file");
                }
            }
        }
        if !removed.is_empty() {
            tracing::debug!(files = ?removed, "Stale files removed");
        }
        removed
    }
}
