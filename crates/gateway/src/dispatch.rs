//! The staged request pipeline.
//!
//! Every inbound request runs the same fixed sequence: request-id resolution,
//! CORS preflight, built-in health check, route resolution, authentication
//! gate, input validation, use-case invocation, response assembly. Any stage
//! may short-circuit with a final response. A single top-level boundary turns
//! anything unexpected (including a panicking handler) into a 500 that still
//! honors the header contract.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::body::{Body, Bytes, to_bytes};
use axum::http::{HeaderMap, Method, Request, Response, StatusCode};
use chrono::Utc;
use futures::FutureExt;
use serde_json::json;

use orgkit_auth::{AuthContext, Authenticator, Principal};

use crate::config::GatewayConfig;
use crate::cors::CorsHeaders;
use crate::error::{self, ErrorBody, codes};
use crate::handler::{UseCaseFailure, UseCaseRequest};
use crate::observer::{self, RequestObserver, RequestRecord};
use crate::request_id::RequestId;
use crate::response::{self, ResponseHook};
use crate::router::{CompiledRoute, RouteTable};
use crate::validate::{self, ValidationOutcome};

/// Cap on buffered request bodies. Oversized bodies degrade to an empty
/// object the same way malformed JSON does.
const BODY_LIMIT: usize = 1024 * 1024;

/// Reserved path (relative to the base path) answered without routing.
const HEALTH_SUFFIX: &str = "/health";

/// The request pipeline. Constructed once with the route table, the immutable
/// configuration, and the external capabilities; shared read-only across
/// concurrent requests.
pub struct Dispatcher {
    table: RouteTable,
    config: GatewayConfig,
    cors: CorsHeaders,
    health_path: String,
    authenticator: Arc<dyn Authenticator>,
    hook: Option<Arc<dyn ResponseHook>>,
    observer: Option<Arc<dyn RequestObserver>>,
}

impl Dispatcher {
    pub fn new(
        table: RouteTable,
        config: GatewayConfig,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        let cors = CorsHeaders::from_config(&config.cors);
        let health_path = format!("{}{}", config.base_path, HEALTH_SUFFIX);
        Self {
            table,
            config,
            cors,
            health_path,
            authenticator,
            hook: None,
            observer: None,
        }
    }

    /// Install a response-transformation hook (runs on handler responses only).
    pub fn with_response_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Install a best-effort request observer.
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run the full stage sequence for one request.
    pub async fn dispatch(&self, request: Request<Body>) -> Response<Body> {
        let started = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        // Resolved before anything else so even the earliest short-circuit
        // carries the id.
        let request_id = RequestId::resolve(request.headers());

        let outcome = AssertUnwindSafe(self.run(request, &request_id))
            .catch_unwind()
            .await;

        let response = match outcome {
            Ok(response) => response,
            Err(panic) => {
                let message = panic_message(panic);
                tracing::error!(request_id = %request_id, panic = %message, "request pipeline panicked");
                let failure = UseCaseFailure::Unexpected(anyhow::anyhow!(message));
                let (status, body) = error::to_http_error(&failure, &request_id);
                response::error_response(status, body, &self.cors, &request_id)
            }
        };

        let status = response.status();
        if self.config.debug {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = status.as_u16(),
                latency_ms = started.elapsed().as_millis() as u64,
                "request completed"
            );
        }

        observer::notify(
            self.observer.as_ref(),
            RequestRecord {
                method,
                path,
                status,
                request_id,
                latency: started.elapsed(),
            },
        );

        response
    }

    async fn run(&self, request: Request<Body>, request_id: &RequestId) -> Response<Body> {
        // CORS preflight: answered before routing, auth, or validation.
        if request.method() == Method::OPTIONS {
            return response::text_response(StatusCode::OK, "ok", &self.cors, request_id);
        }

        let path = request.uri().path().to_string();

        // Built-in health check bypasses routing entirely.
        if path == self.health_path {
            let body = json!({
                "status": "healthy",
                "timestamp": Utc::now(),
                "requestId": request_id,
            });
            return response::json_response(StatusCode::OK, &body, &self.cors, request_id);
        }

        // Route resolution.
        let method = request.method().clone();
        let Some(matched) = self.table.find(&method, &path) else {
            let body = ErrorBody::new(
                codes::NOT_FOUND,
                format!("Route {method} {path} not found"),
                request_id,
            );
            return response::error_response(StatusCode::NOT_FOUND, body, &self.cors, request_id);
        };

        // Authentication gate.
        let principal = self.resolve_principal(matched.route, request.headers()).await;
        if matched.route.auth() == orgkit_auth::AuthRequirement::Required && principal.is_anonymous()
        {
            let body = ErrorBody::new(codes::UNAUTHORIZED, "Authentication required", request_id);
            return response::error_response(
                StatusCode::UNAUTHORIZED,
                body,
                &self.cors,
                request_id,
            );
        }

        // Input validation over the combined {body, params, query} candidate.
        let query_pairs = validate::parse_query(request.uri().query());
        let body_bytes = read_body(request).await;
        let candidate = validate::build_candidate(&body_bytes, &matched.params, &query_pairs);
        let input = match matched.route.validator() {
            Some(validator) => match validator.validate(&candidate).await {
                ValidationOutcome::Valid(value) => value,
                ValidationOutcome::Invalid(issues) => {
                    let (status, body) = error::validation_failed(&issues, request_id);
                    return response::error_response(status, body, &self.cors, request_id);
                }
            },
            None => candidate,
        };

        // Use-case invocation.
        let use_case_request = UseCaseRequest {
            input,
            principal,
            request_id: request_id.clone(),
        };
        match matched.route.handler().handle(use_case_request).await {
            Ok(success) => {
                response::handler_response(success, self.hook.as_deref(), &self.cors, request_id)
            }
            Err(failure) => {
                if let UseCaseFailure::Unexpected(err) = &failure {
                    tracing::error!(request_id = %request_id, error = %err, "use case failed unexpectedly");
                }
                let (status, body) = error::to_http_error(&failure, request_id);
                response::error_response(status, body, &self.cors, request_id)
            }
        }
    }

    /// Resolve the request principal per the route's auth requirement.
    ///
    /// `None` routes never touch the authenticator. Capability errors are
    /// demoted to anonymous: an authentication failure is not an error
    /// response by itself.
    async fn resolve_principal(&self, route: &CompiledRoute, headers: &HeaderMap) -> Principal {
        if !route.auth().attempts_authentication() {
            return Principal::Anonymous;
        }

        let context = auth_context_from(headers);
        match self.authenticator.authenticate(&context).await {
            Ok(Some(subject)) => Principal::Authenticated { subject },
            Ok(None) => Principal::Anonymous,
            Err(err) => {
                tracing::warn!(error = %err, "authenticator failed; treating request as anonymous");
                Principal::Anonymous
            }
        }
    }
}

async fn read_body(request: Request<Body>) -> Bytes {
    to_bytes(request.into_body(), BODY_LIMIT)
        .await
        .unwrap_or_else(|_| Bytes::new())
}

fn auth_context_from(headers: &HeaderMap) -> AuthContext {
    AuthContext::from_header_pairs(
        headers
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v))),
    )
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
