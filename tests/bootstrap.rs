//! End-to-end provisioning tests against a local artifact server.

use std::sync::Arc;
use std::time::Duration;

use node_bootstrap::artifacts::Architecture;
use node_bootstrap::launch::TunnelMode;
use node_bootstrap::lifecycle::{self, bootstrap_for};
use node_bootstrap::Shutdown;
use tokio::net::TcpListener;

mod common;

#[tokio::test]
async fn test_every_optional_combination_boots() {
    let artifacts = common::start_mock_server(&[]).await;
    let control = common::start_mock_server(&[]).await;
    let token = "A".repeat(160);

    for mask in 0u8..16 {
        let dir = tempfile::tempdir().unwrap();
        let mut config = common::test_config(dir.path(), &artifacts);
        if mask & 1 != 0 {
            config.control.url = Some(control.url());
        }
        if mask & 2 != 0 {
            config.agent.server = Some("dash.example.com:443".into());
            config.agent.key = Some("secret".into());
        }
        if mask & 4 != 0 {
            config.tunnel.domain = Some("node.example.com".into());
        }
        if mask & 8 != 0 {
            config.tunnel.auth = Some(token.clone());
        }

        let report = bootstrap_for(&config, Architecture::Amd64)
            .await
            .unwrap_or_else(|e| panic!("combination {mask:#06b} failed: {e}"));

        assert!(report.launched.is_empty(), "nothing was downloaded");
        assert!(report.fetched.is_empty());
        assert!(report.workspace.proxy_config().exists());
        let expected_mode = if mask & 8 != 0 { TunnelMode::Token } else { TunnelMode::Temporary };
        assert_eq!(report.tunnel_mode, expected_mode);
    }

    // No sub.txt ever existed, so the control endpoint was never called.
    assert!(control.requests().is_empty());
}

#[tokio::test]
async fn test_health_route_answers_after_failed_provisioning() {
    let artifacts = common::start_mock_server(&[]).await;
    let dir = tempfile::tempdir().unwrap();
    let config = Arc::new(common::test_config(dir.path(), &artifacts));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();
    let server = tokio::spawn(async move {
        lifecycle::run(config, listener, &server_shutdown).await
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let mut response = None;
    for _ in 0..50 {
        if let Ok(res) = client.get(format!("http://{addr}/")).send().await {
            response = Some(res);
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    let response = response.expect("health route unreachable");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), node_bootstrap::http::HEALTH_BODY);

    let res = client.get(format!("http://{addr}/sub")).send().await.unwrap();
    assert_eq!(res.status(), 404, "no tunnel domain, no subscription");

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), server).await.unwrap().unwrap();
    assert!(result.is_ok());
}

#[cfg(unix)]
#[tokio::test]
async fn test_downloaded_binaries_are_executable_and_launched() {
    use std::os::unix::fs::PermissionsExt;

    let script: &[u8] = b"#!/bin/sh\nexit 0\n";
    let artifacts = common::start_mock_server(&[("/arm64/web", 200, script)]).await;
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(dir.path(), &artifacts);

    let report = bootstrap_for(&config, Architecture::from_arch_str("aarch64")).await.unwrap();

    assert_eq!(report.fetched, ["web"]);
    assert_eq!(report.failed, ["bot"]);

    let web = report.workspace.file("web");
    let mode = std::fs::metadata(&web).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
    assert!(!report.workspace.file("bot").exists(), "failed download leaves no file");

    assert_eq!(report.launched.len(), 1);
    assert_eq!(report.launched[0].name, "web");

    let paths: Vec<_> = artifacts.requests().into_iter().map(|r| r.path).collect();
    assert!(paths.contains(&"/arm64/web".to_string()));
    assert!(paths.contains(&"/arm64/2go".to_string()));
}

#[tokio::test]
async fn test_stale_files_are_replaced() {
    let artifacts = common::start_mock_server(&[]).await;
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(dir.path(), &artifacts);
    for name in ["bot", "boot.log", "sub.txt"] {
        std::fs::write(dir.path().join(name), b"old").unwrap();
    }

    let report = bootstrap_for(&config, Architecture::Amd64).await.unwrap();

    assert_eq!(report.failed, ["web", "bot"]);
    assert!(!dir.path().join("bot").exists());
    assert!(!dir.path().join("boot.log").exists());
    assert!(!dir.path().join("sub.txt").exists());
}
