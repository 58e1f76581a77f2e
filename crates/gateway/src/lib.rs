//! `orgkit-gateway` — the HTTP request dispatch pipeline.
//!
//! A self-contained front end that compiles route templates into matchers,
//! runs a fixed sequence of cross-cutting stages (CORS, request id, auth,
//! validation), and guarantees a uniform response contract regardless of
//! which stage fails. Business logic, token verification, and shape
//! validation are injected capabilities, so the pipeline is reusable across
//! hosting environments.

pub mod config;
pub mod cors;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod observer;
pub mod request_id;
pub mod response;
pub mod router;
pub mod serve;
pub mod validate;

pub use config::{CorsConfig, GatewayConfig};
pub use dispatch::Dispatcher;
pub use error::{ErrorBody, codes, to_http_error};
pub use handler::{
    ResponseBody, UseCaseFailure, UseCaseHandler, UseCaseRequest, UseCaseResponse, UseCaseResult,
};
pub use observer::{RequestObserver, RequestRecord};
pub use request_id::{REQUEST_ID_HEADER, RequestId};
pub use response::{AssembledResponse, ResponseHook};
pub use router::{Route, RouteTable};
pub use validate::{FieldIssue, ValidationOutcome, Validator};
