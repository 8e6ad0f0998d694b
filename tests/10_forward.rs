use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rowgate::config::{StoreConfig, WebhookConfig};
use rowgate::forwarder::{forward_all, HttpWebhook};
use rowgate::store::{RestStore, RowStore, StoreError};

fn store_config(server: &MockServer, collection: &str) -> StoreConfig {
    StoreConfig {
        base_url: server.uri().parse().expect("mock server URI"),
        api_key: "test-key".into(),
        collection: collection.into(),
    }
}

fn webhook_config(server: &MockServer) -> WebhookConfig {
    WebhookConfig { url: format!("{}/ingest", server.uri()).parse().expect("mock server URI") }
}

#[tokio::test]
async fn forwards_rows_verbatim() -> Result<()> {
    let store_server = MockServer::start().await;
    let webhook_server = MockServer::start().await;

    let rows = json!([
        {"id": 7, "requested_by": "amara", "approved": true},
        {"id": 3, "requested_by": "jonas", "approved": false, "note": null},
    ]);

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff_requests"))
        .and(query_param("select", "*"))
        .and(header("apikey", "test-key"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows.clone()))
        .expect(1)
        .mount(&store_server)
        .await;

    // Exactly one POST whose body deep-equals the fetched collection,
    // order and fields untouched.
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .and(header("content-type", "application/json"))
        .and(body_json(rows.clone()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&webhook_server)
        .await;

    let store = RestStore::new(&store_config(&store_server, "staff_requests"));
    let sink = HttpWebhook::new(&webhook_config(&webhook_server));

    forward_all(&store, &sink).await;

    Ok(())
}

#[tokio::test]
async fn forwards_empty_collection_as_empty_array() -> Result<()> {
    let store_server = MockServer::start().await;
    let webhook_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&store_server)
        .await;

    Mock::given(method("POST"))
        .and(body_json(json!([])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&webhook_server)
        .await;

    let store = RestStore::new(&store_config(&store_server, "staff_requests"));
    let sink = HttpWebhook::new(&webhook_config(&webhook_server));

    forward_all(&store, &sink).await;

    Ok(())
}

#[tokio::test]
async fn failed_read_never_contacts_webhook() -> Result<()> {
    let store_server = MockServer::start().await;
    let webhook_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&store_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&webhook_server)
        .await;

    let store = RestStore::new(&store_config(&store_server, "staff_requests"));
    let sink = HttpWebhook::new(&webhook_config(&webhook_server));

    forward_all(&store, &sink).await;

    Ok(())
}

#[tokio::test]
async fn malformed_store_body_short_circuits_like_a_read_error() -> Result<()> {
    let store_server = MockServer::start().await;
    let webhook_server = MockServer::start().await;

    // Object instead of the expected array of records
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows": []})))
        .mount(&store_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&webhook_server)
        .await;

    let store = RestStore::new(&store_config(&store_server, "staff_requests"));

    match store.fetch_all().await {
        Err(StoreError::Shape(_)) => {}
        other => panic!("expected shape error, got {:?}", other.map(|rows| rows.len())),
    }

    let sink = HttpWebhook::new(&webhook_config(&webhook_server));
    forward_all(&store, &sink).await;

    Ok(())
}

#[tokio::test]
async fn webhook_transport_failure_is_absorbed() -> Result<()> {
    let store_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&store_server)
        .await;

    // Nothing listens on this port, so the POST fails at the transport
    // level. forward_all must return normally anyway.
    let dead_port = portpicker::pick_unused_port().expect("free port");
    let sink = HttpWebhook::new(&WebhookConfig {
        url: format!("http://127.0.0.1:{}/ingest", dead_port).parse()?,
    });

    let store = RestStore::new(&store_config(&store_server, "staff_requests"));
    forward_all(&store, &sink).await;

    Ok(())
}

#[tokio::test]
async fn non_success_webhook_status_is_not_an_error() -> Result<()> {
    let store_server = MockServer::start().await;
    let webhook_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .mount(&store_server)
        .await;

    // The status is logged, not acted on; a 503 answer still counts as
    // one completed delivery attempt.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&webhook_server)
        .await;

    let store = RestStore::new(&store_config(&store_server, "staff_requests"));
    let sink = HttpWebhook::new(&webhook_config(&webhook_server));

    forward_all(&store, &sink).await;

    Ok(())
}
