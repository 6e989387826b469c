//! Monitoring agent (v1) configuration.

use serde::Serialize;

use crate::config::NodeConfig;
use crate::launch::agent::is_tls_port;

/// The v1 agent's YAML schema. Field order is the order written.
#[derive(Debug, Serialize, PartialEq)]
pub struct AgentFile<'a> {
    pub client_secret: &'a str,
    pub debug: bool,
    pub disable_auto_update: bool,
    pub disable_command_execute: bool,
    pub disable_force_update: bool,
    pub disable_nat: bool,
    pub disable_send_query: bool,
    pub gpu: bool,
    pub insecure_tls: bool,
    pub ip_report_period: u32,
    pub report_delay: u32,
    pub server: &'a str,
    pub skip_connection_count: bool,
    pub skip_procs_count: bool,
    pub temperature: bool,
    pub tls: bool,
    pub use_gitee_to_upgrade: bool,
    pub use_ipv6_country_code: bool,
    pub uuid: &'a str,
}

impl<'a> AgentFile<'a> {
    pub fn new(server: &'a str, key: &'a str, uuid: &'a str) -> Self {
        Self {
            client_secret: key,
            debug: false,
            disable_auto_update: true,
            disable_command_execute: false,
            disable_force_update: true,
            disable_nat: false,
            disable_send_query: false,
            gpu: false,
            insecure_tls: false,
            ip_report_period: 1800,
            report_delay: 1,
            server,
            skip_connection_count: false,
            skip_procs_count: false,
            temperature: false,
            tls: server_uses_tls(server),
            use_gitee_to_upgrade: false,
            use_ipv6_country_code: false,
            uuid,
        }
    }
}

/// TLS is inferred from the port after the last `:` of `host:port`.
pub fn server_uses_tls(server: &str) -> bool {
    server
        .rsplit_once(':')
        .is_some_and(|(_, port)| is_tls_port(port))
}

/// Render `config.yaml`, or `None` when the agent is not configured.
pub fn render(config: &NodeConfig) -> Result<Option<String>, serde_yaml::Error> {
    let Some((server, key)) = config.agent.credentials() else {
        return Ok(None);
    };
    serde_yaml::to_string(&AgentFile::new(server, key, &config.proxy.uuid)).map(Some)
}
