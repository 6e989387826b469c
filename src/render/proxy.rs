//! Proxy core configuration.
//!
//! One external vless listener on the tunnel port sniffs incoming traffic and
//! falls back to four loopback listeners: plain vless over tcp, and vless,
//! vmess and trojan over websocket.

use serde_json::{json, Value};

use crate::config::NodeConfig;

/// Loopback port of the tcp vless fallback.
pub const VLESS_TCP_PORT: u16 = 3001;
/// Loopback port of the vless websocket listener.
pub const VLESS_WS_PORT: u16 = 3002;
/// Loopback port of the vmess websocket listener.
pub const VMESS_WS_PORT: u16 = 3003;
/// Loopback port of the trojan websocket listener.
pub const TROJAN_WS_PORT: u16 = 3004;

pub const VLESS_WS_PATH: &str = "/vless-argo";
pub const VMESS_WS_PATH: &str = "/vmess-argo";
pub const TROJAN_WS_PATH: &str = "/trojan-argo";

fn sniffing() -> Value {
    json!({ "enabled": true, "destOverride": ["http", "tls", "quic"], "metadataOnly": false })
}

/// Build the configuration document.
pub fn document(config: &NodeConfig) -> Value {
    let uuid = config.proxy.uuid.as_str();

    json!({
        "log": { "access": "/dev/null", "error": "/dev/null", "loglevel": "none" },
        "inbounds": [
            {
                "port": config.tunnel.port,
                "protocol": "vless",
                "settings": {
                    "clients": [{ "id": uuid, "flow": "xtls-rprx-vision" }],
                    "decryption": "none",
                    "fallbacks": [
                        { "dest": VLESS_TCP_PORT },
                        { "path": VLESS_WS_PATH, "dest": VLESS_WS_PORT },
                        { "path": VMESS_WS_PATH, "dest": VMESS_WS_PORT },
                        { "path": TROJAN_WS_PATH, "dest": TROJAN_WS_PORT }
                    ]
                },
                "streamSettings": { "network": "tcp" }
            },
            {
                "port": VLESS_TCP_PORT,
                "listen": "127.0.0.1",
                "protocol": "vless",
                "settings": { "clients": [{ "id": uuid }], "decryption": "none" },
                "streamSettings": { "network": "tcp", "security": "none" }
            },
            {
                "port": VLESS_WS_PORT,
                "listen": "127.0.0.1",
                "protocol": "vless",
                "settings": { "clients": [{ "id": uuid, "level": 0 }], "decryption": "none" },
                "streamSettings": {
                    "network": "ws",
                    "security": "none",
                    "wsSettings": { "path": VLESS_WS_PATH }
                },
                "sniffing": sniffing()
            },
            {
                "port": VMESS_WS_PORT,
                "listen": "127.0.0.1",
                "protocol": "vmess",
                "settings": { "clients": [{ "id": uuid, "alterId": 0 }] },
                "streamSettings": { "network": "ws", "wsSettings": { "path": VMESS_WS_PATH } },
                "sniffing": sniffing()
            },
            {
                "port": TROJAN_WS_PORT,
                "listen": "127.0.0.1",
                "protocol": "trojan",
                "settings": { "clients": [{ "password": uuid }] },
                "streamSettings": {
                    "network": "ws",
                    "security": "none",
                    "wsSettings": { "path": TROJAN_WS_PATH }
                },
                "sniffing": sniffing()
            }
        ],
        "dns": { "servers": ["https+local://8.8.8.8/dns-query"] },
        "outbounds": [
            { "protocol": "freedom", "tag": "direct" },
            { "protocol": "blackhole", "tag": "block" }
        ]
    })
}

/// Render the document as pretty-printed JSON.
pub fn render(config: &NodeConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&document(config))
}
