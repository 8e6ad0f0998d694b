use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::store::HTTP_CLIENT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Up,
    Down,
}

/// Probe the store base URL. Unlike the forwarding chain itself, the
/// probe is bounded by a short timeout so `check` always returns.
pub async fn ping_store(base_url: &Url) -> StoreStatus {
    let result = HTTP_CLIENT
        .get(base_url.clone())
        .timeout(Duration::from_secs(5))
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => StoreStatus::Up,
        _ => StoreStatus::Down,
    }
}

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    match ping_store(&config.store.base_url).await {
        StoreStatus::Up => output_success(
            &output_format,
            &format!("table store at {} is reachable", config.store.base_url),
            Some(json!({ "status": StoreStatus::Up })),
        ),
        StoreStatus::Down => output_error(
            &output_format,
            &format!("table store at {} is unreachable", config.store.base_url),
        ),
    }
}
