use rowgate::config::AppConfig;
use rowgate::forwarder::{forward_all, HttpWebhook};
use rowgate::store::RestStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up the ROWGATE_* settings.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {}", err);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "forwarding collection '{}' to {}",
        config.store.collection,
        config.webhook.url
    );

    let store = RestStore::new(&config.store);
    let sink = HttpWebhook::new(&config.webhook);

    // One fetch-and-relay pass, then exit 0 whatever the outcome.
    // Failures are reported on the log stream only.
    forward_all(&store, &sink).await;
}
