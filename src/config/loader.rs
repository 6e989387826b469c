//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::NodeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, then the process
/// environment, and validate the result.
pub fn load(file: Option<&Path>) -> Result<NodeConfig, ConfigError> {
    let base = match file {
        Some(path) => load_file(path)?,
        None => NodeConfig::default(),
    };
    let config = apply_env(base, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse a TOML configuration file. Missing sections keep their defaults.
pub fn load_file(path: &Path) -> Result<NodeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment values on `config`.
///
/// `lookup` returns the raw value of a variable; empty values are treated as
/// unset so that `FOO=` behaves like an absent `FOO`.
pub fn apply_env<F>(mut config: NodeConfig, lookup: F) -> Result<NodeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let server_port = get("SERVER_PORT")
        .map(|v| ("SERVER_PORT", v))
        .or_else(|| get("PORT").map(|v| ("PORT", v)));
    if let Some((var, v)) = server_port {
        config.server.port = parse_var(var, &v)?;
    }
    if let Some(v) = get("S_PATH") {
        config.server.subscription_path = v;
    }
    if let Some(v) = get("F_PATH") {
        config.workspace.path = PathBuf::from(v);
    }
    if let Some(v) = get("UUID") {
        config.proxy.uuid = v;
    }

    override_opt(&mut config.agent.server, get("N_SERVER"));
    override_opt(&mut config.agent.port, get("N_PORT"));
    override_opt(&mut config.agent.key, get("N_KEY"));

    override_opt(&mut config.tunnel.domain, get("ERGOU_DOMAIN"));
    override_opt(&mut config.tunnel.auth, get("ERGOU_AUTH"));
    if let Some(v) = get("ERGOU_PORT") {
        config.tunnel.port = parse_var("ERGOU_PORT", &v)?;
    }

    if let Some(v) = get("NAME") {
        config.subscription.name = v;
    }
    if let Some(v) = get("CFIP") {
        config.subscription.cdn_host = v;
    }
    if let Some(v) = get("CFPORT") {
        config.subscription.cdn_port = parse_var("CFPORT", &v)?;
    }
    override_opt(&mut config.subscription.project_url, get("P_URL"));

    override_opt(&mut config.control.url, get("UP_URL"));
    if let Some(v) = get("CONTROL_TIMEOUT_SECS") {
        config.control.timeout_secs = parse_var("CONTROL_TIMEOUT_SECS", &v)?;
    }

    if let Some(v) = get("ARTIFACT_URL_TEMPLATE") {
        config.artifacts.url_template = v;
    }
    if let Some(v) = get("DOWNLOAD_TIMEOUT_SECS") {
        config.artifacts.timeout_secs = parse_var("DOWNLOAD_TIMEOUT_SECS", &v)?;
    }

    // A file may also carry empty strings for optional values.
    for opt in [
        &mut config.agent.server,
        &mut config.agent.port,
        &mut config.agent.key,
        &mut config.tunnel.domain,
        &mut config.tunnel.auth,
        &mut config.subscription.project_url,
        &mut config.control.url,
    ] {
        if opt.as_deref().is_some_and(|v| v.trim().is_empty()) {
            *opt = None;
        }
    }

    Ok(config)
}

fn override_opt(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

fn parse_var<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}
