//! Shared library surface for the tagfs API server.
//!
//! The service layer lives here so integration tests (and alternative
//! frontends) can drive it directly; the HTTP binary wires it to axum.

pub mod services;
