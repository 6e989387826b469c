//! Tunnel mode classification and arguments.

use std::sync::LazyLock;

use regex::Regex;

use crate::workspace::Workspace;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9=]{120,250}$").expect("valid token pattern"));

/// How the tunnel client authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelMode {
    /// A bare tunnel token passed on the command line.
    Token,
    /// A credentials JSON written to `tunnel.json` and referenced by `tunnel.yml`.
    ConfigFile,
    /// No usable credential: an anonymous tunnel whose hostname is logged to `boot.log`.
    Temporary,
}

impl TunnelMode {
    pub fn classify(auth: Option<&str>) -> Self {
        match auth {
            Some(auth) if TOKEN_PATTERN.is_match(auth) => TunnelMode::Token,
            Some(auth) if auth.contains("TunnelSecret") => TunnelMode::ConfigFile,
            _ => TunnelMode::Temporary,
        }
    }

    /// Build the tunnel client's arguments for this mode.
    pub fn args(self, auth: Option<&str>, local_port: u16, workspace: &Workspace) -> Vec<String> {
        let mut args: Vec<String> = ["tunnel", "--edge-ip-version", "auto"]
            .into_iter()
            .map(String::from)
            .collect();

        match (self, auth) {
            (TunnelMode::Token, Some(token)) => {
                args.extend(
                    ["--no-autoupdate", "--protocol", "http2", "run", "--token", token]
                        .into_iter()
                        .map(String::from),
                );
            }
            (TunnelMode::ConfigFile, _) => {
                args.push("--config".to_string());
                args.push(workspace.tunnel_routing().display().to_string());
                args.push("run".to_string());
            }
            _ => {
                args.extend(
                    ["--no-autoupdate", "--protocol", "http2", "--logfile"]
                        .into_iter()
                        .map(String::from),
                );
                args.push(workspace.boot_log().display().to_string());
                args.extend(["--loglevel", "info", "--url"].into_iter().map(String::from));
                args.push(format!("http://localhost:{local_port}"));
            }
        }
        args
    }
}
