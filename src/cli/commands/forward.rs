use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::forwarder::{forward_all, HttpWebhook};
use crate::store::RestStore;

/// Run one fetch-and-relay pass with the environment's configuration.
/// Forwarding failures are reported on the log stream and do not fail
/// the command; only a broken configuration does.
pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    let store = RestStore::new(&config.store);
    let sink = HttpWebhook::new(&config.webhook);

    forward_all(&store, &sink).await;

    output_success(
        &output_format,
        &format!("forward pass completed for collection '{}'", config.store.collection),
        Some(json!({
            "collection": config.store.collection,
            "webhook": config.webhook.url.as_str(),
        })),
    )
}
