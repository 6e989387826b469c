//! Control endpoint tests: deregistration and publication.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use node_bootstrap::control::{deregister_previous, publish};
use node_bootstrap::workspace::Workspace;

mod common;

const PREVIOUS: &str = "vless://id@cdn:443?security=tls#old\n\
    vmess://eyJ2IjoiMiJ9\n\
    not a node\n\
    trojan://id@cdn:443?security=tls#old";

#[tokio::test]
async fn test_no_previous_subscription_is_a_noop() {
    let control = common::start_mock_server(&[("/api/delete-nodes", 200, b"{}")]).await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::test_config(dir.path(), &control);
    config.control.url = Some(control.url());
    let ws = Workspace::prepare(dir.path()).unwrap();

    assert_eq!(deregister_previous(&config, &ws).await, 0);
    assert_eq!(deregister_previous(&config, &ws).await, 0);
    assert!(control.requests().is_empty());
}

#[tokio::test]
async fn test_without_control_url_nothing_is_sent() {
    let control = common::start_mock_server(&[]).await;
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(dir.path(), &control);
    let ws = Workspace::prepare(dir.path()).unwrap();
    std::fs::write(ws.subscription(), STANDARD.encode(PREVIOUS)).unwrap();

    assert_eq!(deregister_previous(&config, &ws).await, 0);
    assert!(control.requests().is_empty());
}

#[tokio::test]
async fn test_previous_nodes_are_deleted() {
    let control = common::start_mock_server(&[("/api/delete-nodes", 200, b"{}")]).await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::test_config(dir.path(), &control);
    config.control.url = Some(format!("{}/", control.url()));
    let ws = Workspace::prepare(dir.path()).unwrap();
    std::fs::write(ws.subscription(), STANDARD.encode(PREVIOUS)).unwrap();

    assert_eq!(deregister_previous(&config, &ws).await, 3);

    let requests = control.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/delete-nodes");
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    let nodes: Vec<&str> = body["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(nodes.len(), 3);
    assert!(nodes.iter().all(|n| !n.contains("not a node")));
}

#[tokio::test]
async fn test_control_failure_is_swallowed() {
    let control = common::start_mock_server(&[("/api/delete-nodes", 500, b"boom")]).await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::test_config(dir.path(), &control);
    config.control.url = Some(control.url());
    let ws = Workspace::prepare(dir.path()).unwrap();
    std::fs::write(ws.subscription(), STANDARD.encode(PREVIOUS)).unwrap();

    assert_eq!(deregister_previous(&config, &ws).await, 0);
    assert_eq!(control.requests().len(), 1);

    // Unreachable endpoint: port 1 refuses connections.
    config.control.url = Some("http://127.0.0.1:1".into());
    assert_eq!(deregister_previous(&config, &ws).await, 0);
}

#[tokio::test]
async fn test_publish_nodes_or_subscription() {
    let control = common::start_mock_server(&[
        ("/api/add-nodes", 200, b"{}"),
        ("/api/add-subscriptions", 200, b"{}"),
    ])
    .await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::test_config(dir.path(), &control);
    config.control.url = Some(control.url());
    let links = vec!["vless://a@h:443#n".to_string(), "trojan://b@h:443#n".to_string()];

    publish(&config, &links).await;

    config.subscription.project_url = Some("https://node.example.com/".into());
    config.server.subscription_path = "feed".into();
    publish(&config, &links).await;

    let requests = control.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/api/add-nodes");
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["nodes"].as_array().unwrap().len(), 2);

    assert_eq!(requests[1].path, "/api/add-subscriptions");
    let body: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(body["subscription"][0], "https://node.example.com/feed");
}
