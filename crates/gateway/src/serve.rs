//! Axum host adapter.
//!
//! The host contributes only transport: every path and method funnels into
//! the dispatcher through a catch-all, so routing stays in the pipeline.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;

use crate::dispatch::Dispatcher;

/// Build the host router around a dispatcher.
pub fn app(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new().fallback(entry).with_state(dispatcher)
}

async fn entry(
    State(dispatcher): State<Arc<Dispatcher>>,
    request: Request<Body>,
) -> Response {
    dispatcher.dispatch(request).await
}

/// Serve until the listener closes. Connection lifecycle (and with it,
/// request cancellation) belongs to the host, not the pipeline.
pub async fn serve(dispatcher: Arc<Dispatcher>, listener: TcpListener) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "gateway listening");
    axum::serve(listener, app(dispatcher)).await
}
