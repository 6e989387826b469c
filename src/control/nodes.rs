//! Parsing of subscription documents into node URIs.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;

static NODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(vless|vmess|trojan|hysteria2|tuic)://").expect("valid node pattern")
});

/// Decode a base64 subscription. Content that is not base64 is returned as is.
pub fn decode_subscription(content: &str) -> String {
    let compact: String = content.split_whitespace().collect();
    match STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => content.to_string(),
    }
}

/// Keep the lines that carry a known node URI scheme.
pub fn extract_nodes(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| NODE_PATTERN.is_match(line))
        .map(str::to_owned)
        .collect()
}
