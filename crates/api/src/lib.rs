//! `orgkit-api` — user/organization/membership use cases over HTTP.
//!
//! The interesting machinery lives in `orgkit-gateway`; this crate declares
//! the route table, implements the use cases against an in-memory directory,
//! and supplies the validator and authenticator collaborators.

pub mod app;
pub mod routes;
pub mod rules;
pub mod store;
pub mod token;
