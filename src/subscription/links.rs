//! Node URIs for the websocket inbounds, reached through the CDN.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use url::form_urlencoded::byte_serialize;

use crate::config::NodeConfig;
use crate::render::proxy::{TROJAN_WS_PATH, VLESS_WS_PATH, VMESS_WS_PATH};

/// Early-data suffix appended to every websocket path.
const EARLY_DATA: &str = "?ed=2560";

#[derive(Serialize)]
struct VmessLink<'a> {
    v: &'static str,
    ps: &'a str,
    add: &'a str,
    port: String,
    id: &'a str,
    aid: &'static str,
    scy: &'static str,
    net: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    host: &'a str,
    path: String,
    tls: &'static str,
    sni: &'a str,
    alpn: &'static str,
}

fn encoded_path(path: &str) -> String {
    byte_serialize(format!("{path}{EARLY_DATA}").as_bytes()).collect()
}

/// Percent-encode the node name for the URI fragment. Spaces become `%20`,
/// not the form-style `+`.
fn encoded_name(name: &str) -> String {
    byte_serialize(name.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Build the vless, vmess and trojan links for `domain`.
pub fn build_links(config: &NodeConfig, domain: &str) -> Vec<String> {
    let uuid = config.proxy.uuid.as_str();
    let sub = &config.subscription;
    let host = sub.cdn_host.as_str();
    let port = sub.cdn_port;
    let name = sub.name.as_str();
    let fragment = encoded_name(name);

    let vless = format!(
        "vless://{uuid}@{host}:{port}?encryption=none&security=tls&sni={domain}&type=ws&host={domain}&path={}#{fragment}",
        encoded_path(VLESS_WS_PATH)
    );

    let vmess = VmessLink {
        v: "2",
        ps: name,
        add: host,
        port: port.to_string(),
        id: uuid,
        aid: "0",
        scy: "none",
        net: "ws",
        kind: "none",
        host: domain,
        path: format!("{VMESS_WS_PATH}{EARLY_DATA}"),
        tls: "tls",
        sni: domain,
        alpn: "",
    };
    // Serializing a struct of strings cannot fail.
    let vmess_json = serde_json::to_string(&vmess).unwrap_or_default();
    let vmess = format!("vmess://{}", STANDARD.encode(vmess_json));

    let trojan = format!(
        "trojan://{uuid}@{host}:{port}?security=tls&sni={domain}&type=ws&host={domain}&path={}#{fragment}",
        encoded_path(TROJAN_WS_PATH)
    );

    vec![vless, vmess, trojan]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_use_cdn_and_domain() {
        let config = NodeConfig::default();
        let links = build_links(&config, "node.example.com");
        assert_eq!(links.len(), 3);

        assert_eq!(
            links[0],
            format!(
                "vless://{}@www.visa.com.sg:443?encryption=none&security=tls&sni=node.example.com\
                 &type=ws&host=node.example.com&path=%2Fvless-argo%3Fed%3D2560#Vls",
                config.proxy.uuid
            )
        );
        assert!(links[2].starts_with(&format!("trojan://{}@www.visa.com.sg:443?", config.proxy.uuid)));
        assert!(links[2].contains("path=%2Ftrojan-argo%3Fed%3D2560"));
    }

    #[test]
    fn test_node_name_is_percent_encoded() {
        let mut config = NodeConfig::default();
        config.subscription.name = "US #1 & co".into();
        let links = build_links(&config, "node.example.com");

        assert!(links[0].ends_with("#US%20%231%20%26%20co"), "{}", links[0]);
        assert!(links[2].ends_with("#US%20%231%20%26%20co"), "{}", links[2]);
        assert_eq!(links[0].matches('#').count(), 1);

        let payload = links[1].strip_prefix("vmess://").unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&STANDARD.decode(payload).unwrap()).unwrap();
        assert_eq!(json["ps"], "US #1 & co");
    }

    #[test]
    fn test_vmess_link_payload() {
        let mut config = NodeConfig::default();
        config.subscription.name = "edge".into();
        config.subscription.cdn_port = 8443;
        let links = build_links(&config, "node.example.com");

        let payload = links[1].strip_prefix("vmess://").unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&STANDARD.decode(payload).unwrap()).unwrap();
        assert_eq!(json["ps"], "edge");
        assert_eq!(json["port"], "8443");
        assert_eq!(json["type"], "none");
        assert_eq!(json["host"], "node.example.com");
        assert_eq!(json["path"], "/vmess-argo?ed=2560");
    }
}
