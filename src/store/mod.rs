use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use url::Url;

use crate::config::StoreConfig;

/// One record as returned by the store. Field names and values are
/// opaque to this crate and pass through untouched.
pub type Row = Map<String, Value>;

/// Shared client for all outbound calls. reqwest clients hold a
/// connection pool behind an Arc, so clones are cheap.
pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Errors that can occur while reading a collection
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request to table store failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("table store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("table store response is not a JSON array of records: {0}")]
    Shape(String),
}

/// Read access to one named collection of a remote tabular store.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Collection name, for logging
    fn collection(&self) -> &str;

    /// Fetch every row of the collection in one read-all query,
    /// preserving the store's response order.
    async fn fetch_all(&self) -> Result<Vec<Row>, StoreError>;
}

/// REST implementation against a hosted table store
/// (`GET {base}/rest/v1/{collection}?select=*`).
pub struct RestStore {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
    collection: String,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            collection: config.collection.clone(),
        }
    }

    /// Read-all endpoint for the collection. The base URL may or may not
    /// carry a trailing slash; both forms produce the same path.
    fn rows_url(&self) -> String {
        format!(
            "{}/rest/v1/{}?select=*",
            self.base_url.as_str().trim_end_matches('/'),
            self.collection
        )
    }
}

#[async_trait]
impl RowStore for RestStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn fetch_all(&self) -> Result<Vec<Row>, StoreError> {
        let response = self
            .client
            .get(self.rows_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status: status.as_u16(), body });
        }

        let value: Value = response.json().await?;
        rows_from_value(value)
    }
}

/// Convert a response body into rows, rejecting anything that is not an
/// array of objects. No field is interpreted, dropped, or reordered.
fn rows_from_value(value: Value) -> Result<Vec<Row>, StoreError> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(StoreError::Shape(format!("expected array, got {}", kind(&other)))),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Shape(format!("expected object row, got {}", kind(&other)))),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(base: &str) -> RestStore {
        RestStore::new(&StoreConfig {
            base_url: base.parse().expect("test URL"),
            api_key: "key".into(),
            collection: "staff_requests".into(),
        })
    }

    #[test]
    fn test_rows_url_with_and_without_trailing_slash() {
        let expected = "https://tables.example.com/rest/v1/staff_requests?select=*";
        assert_eq!(store("https://tables.example.com").rows_url(), expected);
        assert_eq!(store("https://tables.example.com/").rows_url(), expected);
    }

    #[test]
    fn test_rows_from_value_preserves_order_and_content() {
        let rows = rows_from_value(json!([
            {"id": 2, "name": "beta"},
            {"id": 1, "name": "alpha"},
        ]))
        .expect("array of objects");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], json!(2));
        assert_eq!(rows[1]["name"], json!("alpha"));
    }

    #[test]
    fn test_rows_from_value_rejects_non_array_bodies() {
        assert!(matches!(rows_from_value(json!({"data": []})), Err(StoreError::Shape(_))));
        assert!(matches!(rows_from_value(json!([1, 2, 3])), Err(StoreError::Shape(_))));
    }
}
