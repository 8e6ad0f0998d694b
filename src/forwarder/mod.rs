use async_trait::async_trait;
use url::Url;

use crate::config::WebhookConfig;
use crate::store::{Row, RowStore, HTTP_CLIENT};

/// Errors that can occur while delivering the payload
#[derive(Debug, thiserror::Error)]
pub enum DeliverError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Write access to the forwarding destination.
#[async_trait]
pub trait WebhookSink: Send + Sync {
    /// Deliver the full row collection as one JSON array body and report
    /// the HTTP status the destination answered with.
    async fn deliver(&self, rows: &[Row]) -> Result<u16, DeliverError>;
}

/// HTTP POST implementation. The request carries
/// `Content-Type: application/json` and no authentication header.
pub struct HttpWebhook {
    client: reqwest::Client,
    url: Url,
}

impl HttpWebhook {
    pub fn new(config: &WebhookConfig) -> Self {
        Self { client: HTTP_CLIENT.clone(), url: config.url.clone() }
    }
}

#[async_trait]
impl WebhookSink for HttpWebhook {
    async fn deliver(&self, rows: &[Row]) -> Result<u16, DeliverError> {
        let response = self.client.post(self.url.clone()).json(rows).send().await?;
        Ok(response.status().as_u16())
    }
}

/// Run the fetch-and-relay chain once: read every row of the store's
/// collection, then post the collection verbatim to the webhook. The
/// write starts only after the read has fully resolved.
///
/// Every failure mode is recovered here and reported on the log stream;
/// nothing escalates to the caller. A failed read short-circuits the
/// chain and the webhook is never contacted. There is no retry and no
/// timeout on either call.
pub async fn forward_all(store: &dyn RowStore, sink: &dyn WebhookSink) {
    let rows = match store.fetch_all().await {
        Ok(rows) => rows,
        Err(err) => {
            tracing::error!("failed to read collection '{}': {}", store.collection(), err);
            return;
        }
    };

    tracing::info!("fetched {} rows from '{}'", rows.len(), store.collection());

    match sink.deliver(&rows).await {
        Ok(status) => tracing::info!("webhook responded with status {}", status),
        Err(err) => tracing::error!("webhook delivery failed: {}", err),
    }
}
