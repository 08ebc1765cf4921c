//! Clients for the external services the API is built on.
//!
//! These are thin adapters: they translate between our domain types and
//! each vendor's HTTP API, and nothing else. The auth provider sits behind
//! a trait so the role gates can be exercised against a stub in tests.

pub mod auth_provider;
pub mod media;
pub mod payments;
