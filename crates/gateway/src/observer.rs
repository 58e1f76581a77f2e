//! Best-effort request telemetry side channel.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};

use crate::request_id::RequestId;

/// What the observer sees for each completed request.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub method: Method,
    pub path: String,
    pub status: StatusCode,
    pub request_id: RequestId,
    pub latency: Duration,
}

/// Optional capability notified after every response.
///
/// Notifications are detached from the request path and never awaited; a
/// slow or panicking observer cannot delay or fail the response.
pub trait RequestObserver: Send + Sync + 'static {
    fn record(&self, record: RequestRecord);
}

pub(crate) fn notify(observer: Option<&Arc<dyn RequestObserver>>, record: RequestRecord) {
    if let Some(observer) = observer {
        let observer = Arc::clone(observer);
        tokio::spawn(async move {
            observer.record(record);
        });
    }
}
