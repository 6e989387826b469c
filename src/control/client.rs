//! HTTP client for the control endpoint.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::NodeConfig;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("control endpoint returned {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Serialize)]
struct NodesBody<'a> {
    nodes: &'a [String],
}

#[derive(Serialize)]
struct SubscriptionBody<'a> {
    subscription: [&'a str; 1],
}

/// Client bound to one control endpoint base URL.
#[derive(Debug, Clone)]
pub struct ControlClient {
    base_url: String,
    client: reqwest::Client,
}

impl ControlClient {
    /// Build a client when a control URL is configured.
    pub fn from_config(config: &NodeConfig) -> Option<Self> {
        let base_url = config.control.url.as_deref()?;
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(config.control.timeout_secs))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build control client");
                return None;
            }
        };
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn delete_nodes(&self, nodes: &[String]) -> Result<(), ControlError> {
        self.post("/api/delete-nodes", &NodesBody { nodes }).await
    }

    pub async fn add_nodes(&self, nodes: &[String]) -> Result<(), ControlError> {
        self.post("/api/add-nodes", &NodesBody { nodes }).await
    }

    pub async fn add_subscription(&self, url: &str) -> Result<(), ControlError> {
        self.post("/api/add-subscriptions", &SubscriptionBody { subscription: [url] })
            .await
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<(), ControlError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Calling control endpoint");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ControlError::Status(status));
        }
        Ok(())
    }
}
