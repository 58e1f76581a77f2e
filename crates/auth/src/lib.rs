//! `orgkit-auth` — authentication boundary types and capability contract.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authenticator;
pub mod principal;
pub mod requirement;

pub use authenticator::{AuthContext, Authenticator};
pub use principal::{Principal, SubjectId};
pub use requirement::AuthRequirement;
