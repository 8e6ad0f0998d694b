use std::env;

use url::Url;

/// Connection settings for the hosted table store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: Url,
    pub api_key: String,
    pub collection: String,
}

/// Destination for the forwarding payload.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: Url,
}

/// Full configuration for the forwarder side of the crate.
///
/// All four values come from the environment so credentials stay out of
/// the binary. The access gate takes its landing route directly and does
/// not read this config.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub webhook: WebhookConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid URL in {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

pub const STORE_URL_VAR: &str = "ROWGATE_STORE_URL";
pub const STORE_KEY_VAR: &str = "ROWGATE_STORE_KEY";
pub const COLLECTION_VAR: &str = "ROWGATE_COLLECTION";
pub const WEBHOOK_URL_VAR: &str = "ROWGATE_WEBHOOK_URL";

impl AppConfig {
    /// Read configuration from the environment. Binaries load `.env`
    /// via dotenvy before calling this.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store: StoreConfig {
                base_url: require_url(STORE_URL_VAR)?,
                api_key: require(STORE_KEY_VAR)?,
                collection: require(COLLECTION_VAR)?,
            },
            webhook: WebhookConfig {
                url: require_url(WEBHOOK_URL_VAR)?,
            },
        })
    }
}

/// Fetch a required variable. Empty values count as missing so a blank
/// line in `.env` does not masquerade as configuration.
fn require(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn require_url(var: &'static str) -> Result<Url, ConfigError> {
    let raw = require(var)?;
    Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { var, source })
}
