//! Which executables to download, and from where.

use crate::artifacts::Architecture;
use crate::config::NodeConfig;
use crate::launch::AgentVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Agent(AgentVariant),
    ProxyCore,
    TunnelClient,
}

/// One executable to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// File name inside the workspace.
    pub file_name: &'static str,
    pub url: String,
}

fn expand(template: &str, arch: Architecture, remote: &str) -> String {
    template
        .replace("{arch}", arch.as_str())
        .replace("{file}", remote)
}

/// Build the ordered download list. The agent comes first when configured.
pub fn artifact_plan(config: &NodeConfig, arch: Architecture) -> Vec<Artifact> {
    let template = config.artifacts.url_template.as_str();
    let mut plan = Vec::with_capacity(3);

    if config.agent.credentials().is_some() {
        let variant = AgentVariant::select(&config.agent);
        plan.push(Artifact {
            kind: ArtifactKind::Agent(variant),
            file_name: variant.file_name(),
            url: expand(template, arch, variant.remote_name()),
        });
    }

    plan.push(Artifact {
        kind: ArtifactKind::ProxyCore,
        file_name: "web",
        url: expand(template, arch, "web"),
    });
    plan.push(Artifact {
        kind: ArtifactKind::TunnelClient,
        file_name: "bot",
        url: expand(template, arch, "2go"),
    });

    plan
}
