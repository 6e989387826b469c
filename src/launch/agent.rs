//! Monitoring agent variant selection and arguments.

use crate::config::AgentConfig;
use crate::workspace::Workspace;

/// Ports on which the dashboard is assumed to speak TLS.
pub const TLS_PORTS: [&str; 6] = ["443", "8443", "2096", "2087", "2083", "2053"];

pub fn is_tls_port(port: &str) -> bool {
    TLS_PORTS.contains(&port.trim())
}

/// Which agent generation to download and run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentVariant {
    /// Legacy agent configured on the command line; chosen when a port is given.
    V0,
    /// Current agent configured through `config.yaml`.
    V1,
}

impl AgentVariant {
    pub fn select(agent: &AgentConfig) -> Self {
        if agent.port.is_some() {
            AgentVariant::V0
        } else {
            AgentVariant::V1
        }
    }

    /// Local file name of the binary.
    pub fn file_name(self) -> &'static str {
        match self {
            AgentVariant::V0 => "npm",
            AgentVariant::V1 => "php",
        }
    }

    /// Remote name under the artifact host.
    pub fn remote_name(self) -> &'static str {
        match self {
            AgentVariant::V0 => "agent",
            AgentVariant::V1 => "v1",
        }
    }
}

/// Build the agent's arguments, or `None` when the agent is not configured.
pub fn agent_args(agent: &AgentConfig, workspace: &Workspace) -> Option<Vec<String>> {
    let (server, key) = agent.credentials()?;

    let args = match (AgentVariant::select(agent), agent.port.as_deref()) {
        (AgentVariant::V0, Some(port)) => {
            let mut args = vec![
                "-s".to_string(),
                format!("{server}:{port}"),
                "-p".to_string(),
                key.to_string(),
            ];
            if is_tls_port(port) {
                args.push("--tls".to_string());
            }
            args
        }
        _ => vec!["-c".to_string(), workspace.agent_config().display().to_string()],
    };
    Some(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn agent(server: Option<&str>, port: Option<&str>, key: Option<&str>) -> AgentConfig {
        AgentConfig {
            server: server.map(Into::into),
            port: port.map(Into::into),
            key: key.map(Into::into),
        }
    }

    fn workspace() -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::prepare(dir.path()).unwrap();
        (dir, ws)
    }

    #[test]
    fn test_tls_ports() {
        for port in TLS_PORTS {
            assert!(is_tls_port(port));
        }
        assert!(!is_tls_port("80"));
        assert!(!is_tls_port("5555"));
        assert!(!is_tls_port(""));
    }

    #[test]
    fn test_variant_selection() {
        assert_eq!(AgentVariant::select(&agent(Some("d"), Some("5555"), Some("k"))), AgentVariant::V0);
        assert_eq!(AgentVariant::select(&agent(Some("d:443"), None, Some("k"))), AgentVariant::V1);
        assert_eq!(AgentVariant::V0.file_name(), "npm");
        assert_eq!(AgentVariant::V1.remote_name(), "v1");
    }

    #[test]
    fn test_v0_args_with_and_without_tls() {
        let (_dir, ws) = workspace();
        let args = agent_args(&agent(Some("dash"), Some("443"), Some("k")), &ws).unwrap();
        assert_eq!(args, ["-s", "dash:443", "-p", "k", "--tls"]);

        let args = agent_args(&agent(Some("dash"), Some("5555"), Some("k")), &ws).unwrap();
        assert_eq!(args, ["-s", "dash:5555", "-p", "k"]);
    }

    #[test]
    fn test_v1_args_point_at_config() {
        let (_dir, ws) = workspace();
        let args = agent_args(&agent(Some("dash:443"), None, Some("k")), &ws).unwrap();
        assert_eq!(args[0], "-c");
        assert_eq!(PathBuf::from(&args[1]), ws.agent_config());
    }

    #[test]
    fn test_unconfigured_agent_has_no_args() {
        let (_dir, ws) = workspace();
        assert!(agent_args(&agent(Some("dash"), None, None), &ws).is_none());
        assert!(agent_args(&agent(None, Some("443"), Some("k")), &ws).is_none());
    }
}
