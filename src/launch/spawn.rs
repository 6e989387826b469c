//! Detached process spawning.
//!
//! The child is started in its own process group with null stdio and then
//! forgotten. Tokio reaps it in the background when it exits; nothing observes
//! its exit status, output or crashes.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("binary {0} not found")]
    Missing(PathBuf),

    #[error("failed to spawn {path}: {source}")]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A child that was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launched {
    pub name: String,
    pub pid: Option<u32>,
}

/// Start `program` with `args`, detached from this process.
///
/// Returns as soon as the child is spawned.
pub fn spawn_detached(program: &Path, args: &[String]) -> Result<Launched, LaunchError> {
    if !program.is_file() {
        return Err(LaunchError::Missing(program.to_path_buf()));
    }

    let mut std_command = std::process::Command::new(program);
    std_command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        std_command.process_group(0);
    }

    let mut command = Command::from(std_command);
    command.kill_on_drop(false);

    let child = command.spawn().map_err(|source| LaunchError::Spawn {
        path: program.to_path_buf(),
        source,
    })?;

    let name = program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let pid = child.id();
    tracing::info!(name = %name, pid = ?pid, "Process launched");

    Ok(Launched { name, pid })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let err = spawn_detached(&dir.path().join("web"), &[]).unwrap_err();
        assert!(matches!(err, LaunchError::Missing(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_returns_without_waiting() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("web");
        std::fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let started = std::time::Instant::now();
        let launched = spawn_detached(&script, &["-c".to_string(), "x".to_string()]).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert_eq!(launched.name, "web");
        assert!(launched.pid.is_some());
    }
}
