//! HTTP downloads into the workspace.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::future::join_all;
use thiserror::Error;

use crate::artifacts::Artifact;
use crate::workspace::Workspace;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result of one download.
#[derive(Debug)]
pub struct FetchOutcome {
    pub artifact: Artifact,
    pub result: Result<PathBuf, FetchError>,
}

impl FetchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Downloads executables with a shared client.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Build a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Download `url` to `dest` and mark it executable.
    ///
    /// On any failure the partial file is removed.
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<PathBuf, FetchError> {
        match self.download(url, dest).await {
            Ok(()) => Ok(dest.to_path_buf()),
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(dest).await {
                    if rm.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(path = %dest.display(), error = %rm, "Failed to remove partial download");
                    }
                }
                Err(e)
            }
        }
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let bytes = response.bytes().await?;
        let io_err = |source| FetchError::Io {
            path: dest.to_path_buf(),
            source,
        };
        tokio::fs::write(dest, &bytes).await.map_err(io_err)?;
        set_executable(dest).await.map_err(io_err)?;
        Ok(())
    }
}

#[cfg(unix)]
async fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await
}

#[cfg(not(unix))]
async fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Download every artifact concurrently and wait for all of them.
pub async fn fetch_all(
    fetcher: &Fetcher,
    workspace: &Workspace,
    plan: Vec<Artifact>,
) -> Vec<FetchOutcome> {
    let downloads = plan.into_iter().map(|artifact| async move {
        let dest = workspace.file(artifact.file_name);
        let result = fetcher.fetch(&artifact.url, &dest).await;
        match &result {
            Ok(_) => tracing::info!(file = artifact.file_name, url = %artifact.url, "Download succeeded"),
            Err(e) => tracing::error!(file = artifact.file_name, url = %artifact.url, error = %e, "Download failed"),
        }
        FetchOutcome { artifact, result }
    });

    join_all(downloads).await
}
