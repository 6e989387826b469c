//! Configuration validation.
//!
//! Serde handles syntax; this checks values that would otherwise surface as a
//! broken proxy core or a confusing request failure much later.
//! Returns all validation errors, not just the first.

use thiserror::Error;
use url::Url;

use crate::config::schema::NodeConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} {value:?} is not a valid URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("subscription path {0:?} must be a single non-empty path segment")]
    InvalidSubscriptionPath(String),

    #[error("artifact URL template {0:?} has no {{file}} placeholder")]
    InvalidUrlTemplate(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &NodeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // The proxy core maps non-UUID ids onto UUIDv5 and trojan uses the value
    // as a password; the id is passed through as given.
    if uuid::Uuid::parse_str(&config.proxy.uuid).is_err() {
        tracing::warn!(uuid = %config.proxy.uuid, "Client id is not a UUID, passing it through");
    }

    for (field, value) in [
        ("control url", &config.control.url),
        ("project url", &config.subscription.project_url),
    ] {
        if let Some(value) = value {
            if Url::parse(value).is_err() {
                errors.push(ValidationError::InvalidUrl {
                    field,
                    value: value.clone(),
                });
            }
        }
    }

    if !is_valid_route_segment(&config.server.subscription_path) {
        errors.push(ValidationError::InvalidSubscriptionPath(
            config.server.subscription_path.clone(),
        ));
    }

    if !config.artifacts.url_template.contains("{file}") {
        errors.push(ValidationError::InvalidUrlTemplate(
            config.artifacts.url_template.clone(),
        ));
    }

    if config.artifacts.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("download timeout"));
    }
    if config.control.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("control timeout"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Whether `segment` can be registered as a literal axum route segment.
///
/// Axum rejects segments starting with `:` or `*` and treats braces as
/// parameter captures; both panic at route registration.
pub fn is_valid_route_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with([':', '*'])
        && !segment.contains(['/', '{', '}'])
}
