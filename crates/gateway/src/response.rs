//! Response assembly.
//!
//! Every response (success, error, preflight, health) goes through here so
//! the header contract is uniform: CORS headers first, then `X-Request-ID`,
//! then handler-declared custom headers, which may override the earlier two.

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode, header};
use serde_json::Value;

use crate::cors::CorsHeaders;
use crate::error::ErrorBody;
use crate::handler::UseCaseResponse;
use crate::request_id::{REQUEST_ID_HEADER, RequestId};

/// A response in pieces, as seen by the transformation hook.
#[derive(Debug, Clone)]
pub struct AssembledResponse {
    pub status: StatusCode,
    /// The serialized-to-be JSON body, if any.
    pub body: Option<Value>,
    /// Custom headers, applied after CORS and request-id.
    pub headers: Vec<(String, String)>,
}

/// Hook that may rewrite status/body/headers of a handler response before it
/// is returned. Runs only on the handler path, not on short-circuits.
pub trait ResponseHook: Send + Sync {
    fn transform(&self, response: AssembledResponse) -> AssembledResponse;
}

/// A JSON response with the standard header set.
pub fn json_response(
    status: StatusCode,
    body: &Value,
    cors: &CorsHeaders,
    request_id: &RequestId,
) -> Response<Body> {
    let mut headers = base_headers(cors, request_id);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    let payload = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    finish(status, headers, Body::from(payload))
}

/// A plain-text response with the standard header set (preflight only).
pub fn text_response(
    status: StatusCode,
    text: &'static str,
    cors: &CorsHeaders,
    request_id: &RequestId,
) -> Response<Body> {
    let mut headers = base_headers(cors, request_id);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    finish(status, headers, Body::from(text))
}

/// An error envelope response with the standard header set.
pub fn error_response(
    status: StatusCode,
    body: ErrorBody,
    cors: &CorsHeaders,
    request_id: &RequestId,
) -> Response<Body> {
    json_response(status, &body.into_envelope(), cors, request_id)
}

/// Assemble a handler response: run the optional hook, then merge headers in
/// precedence order and serialize the envelope.
pub fn handler_response(
    response: UseCaseResponse,
    hook: Option<&dyn ResponseHook>,
    cors: &CorsHeaders,
    request_id: &RequestId,
) -> Response<Body> {
    let assembled = AssembledResponse {
        status: response.status,
        body: response.body.into_envelope(),
        headers: response.headers,
    };
    let assembled = match hook {
        Some(hook) => hook.transform(assembled),
        None => assembled,
    };

    let mut headers = base_headers(cors, request_id);
    let body = match &assembled.body {
        Some(value) => {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            Body::from(serde_json::to_vec(value).unwrap_or_else(|_| b"{}".to_vec()))
        }
        None => Body::empty(),
    };

    for (name, value) in &assembled.headers {
        let parsed = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        );
        if let (Ok(name), Ok(value)) = parsed {
            headers.insert(name, value);
        } else {
            tracing::warn!(header = %name, "dropping malformed custom response header");
        }
    }

    finish(assembled.status, headers, body)
}

fn base_headers(cors: &CorsHeaders, request_id: &RequestId) -> HeaderMap {
    let mut headers = HeaderMap::new();
    cors.apply(&mut headers);
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        headers.insert(REQUEST_ID_HEADER.clone(), value);
    }
    headers
}

fn finish(status: StatusCode, headers: HeaderMap, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
