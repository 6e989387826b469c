//! Tunnel credentials and routing files.
//!
//! Only used when the tunnel credential is a credentials JSON (it contains a
//! `TunnelSecret`). The routing file sends the fixed domain to the local
//! proxy inbound and answers 404 for everything else.

use std::path::Path;

use serde::Serialize;

use crate::render::RenderError;

#[derive(Debug, Serialize)]
pub struct TunnelFile<'a> {
    pub tunnel: &'a str,
    #[serde(rename = "credentials-file")]
    pub credentials_file: String,
    pub protocol: &'static str,
    pub ingress: Vec<IngressRule<'a>>,
}

#[derive(Debug, Serialize)]
pub struct IngressRule<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<&'a str>,
    pub service: String,
    #[serde(rename = "originRequest", skip_serializing_if = "Option::is_none")]
    pub origin_request: Option<OriginRequest>,
}

#[derive(Debug, Serialize)]
pub struct OriginRequest {
    #[serde(rename = "noTLSVerify")]
    pub no_tls_verify: bool,
}

/// Extract the tunnel id from a credentials JSON document.
pub fn tunnel_id(credential: &str) -> Result<String, RenderError> {
    let value: serde_json::Value = serde_json::from_str(credential)?;
    value
        .get("TunnelID")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .ok_or(RenderError::MissingTunnelId)
}

/// Render `tunnel.yml`.
pub fn render_routing(
    tunnel_id: &str,
    credentials_file: &Path,
    domain: &str,
    local_port: u16,
) -> Result<String, RenderError> {
    let file = TunnelFile {
        tunnel: tunnel_id,
        credentials_file: credentials_file.display().to_string(),
        protocol: "http2",
        ingress: vec![
            IngressRule {
                hostname: Some(domain),
                service: format!("http://localhost:{local_port}"),
                origin_request: Some(OriginRequest { no_tls_verify: true }),
            },
            IngressRule {
                hostname: None,
                service: "http_status:404".to_string(),
                origin_request: None,
            },
        ],
    };
    Ok(serde_yaml::to_string(&file)?)
}
