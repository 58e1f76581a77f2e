use std::sync::Arc;

use orgkit_api::app::build_app;
use orgkit_api::token::StaticTokenAuthenticator;
use orgkit_gateway::GatewayConfig;

#[tokio::main]
async fn main() {
    orgkit_observability::init();

    let base_path = std::env::var("BASE_PATH").unwrap_or_else(|_| "/api".to_string());
    let debug = std::env::var("DEBUG")
        .map(|value| value == "1" || value == "true")
        .unwrap_or(false);
    let config = GatewayConfig::new(base_path).with_debug(debug);

    let api_token = std::env::var("API_TOKEN").unwrap_or_else(|_| {
        tracing::warn!("API_TOKEN not set; using insecure dev default");
        "dev-token".to_string()
    });
    let authenticator = Arc::new(StaticTokenAuthenticator::new().with_token(api_token, "dev"));

    let app = build_app(config, authenticator);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind listener");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
