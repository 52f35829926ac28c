use axum::{routing::get, Router};
use axum_prometheus::PrometheusMetricLayer;
use signed_url_resolver::config;
use signed_url_resolver::{document_routes, ObjectSigner, S3Signer, SettingsSource};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

async fn root() -> &'static str {
    "Signed URL Resolver"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    dotenvy::dotenv().ok();

    let signer: Arc<dyn ObjectSigner> = Arc::new(S3Signer::from_env()?);
    // Credentials are validated again on every request; startup only warns.
    if let Err(error) = config::storage_settings_from_env().credentials() {
        tracing::warn!(%error, "storage configuration incomplete at startup");
    }

    let (prometheus_layer, metrics_handle) = PrometheusMetricLayer::pair();
    let app = Router::new()
        .route("/", get(root))
        .route(
            "/metrics",
            get(move || async move { metrics_handle.render() }),
        )
        .merge(document_routes(signer, SettingsSource::Environment))
        .layer(prometheus_layer);

    let addr: SocketAddr = format!("{}:{}", config::BIND_ADDRESS.as_str(), *config::BIND_PORT)
        .parse()
        .map_err(|error| Box::new(error) as Box<dyn std::error::Error>)?;
    tracing::info!(%addr, "Listening for incoming connections");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
