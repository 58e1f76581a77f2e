//! Application wiring: directory, route table, dispatcher, host app.

use std::sync::Arc;

use axum::Router;

use orgkit_auth::Authenticator;
use orgkit_gateway::{Dispatcher, GatewayConfig};

use crate::routes;
use crate::store::Directory;

/// Build the dispatcher for a given directory. Exposed so callers can attach
/// a response hook or observer before serving.
pub fn build_dispatcher(
    config: GatewayConfig,
    authenticator: Arc<dyn Authenticator>,
    directory: Arc<Directory>,
) -> Dispatcher {
    let table = routes::route_table(&config.base_path, directory);
    Dispatcher::new(table, config, authenticator)
}

/// Build the full application with a fresh in-memory directory.
pub fn build_app(config: GatewayConfig, authenticator: Arc<dyn Authenticator>) -> Router {
    let directory = Arc::new(Directory::default());
    let dispatcher = build_dispatcher(config, authenticator, directory);
    orgkit_gateway::serve::app(Arc::new(dispatcher))
}
