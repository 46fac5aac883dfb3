//! HTTP middleware for axum.
//!
//! - `identity` - Trusted-header identity middleware and extractors

pub mod identity;

pub use identity::{identity_middleware, IdentityRejection, RequireMember};
