//! Service library for the wayfinder HTTP server.
//!
//! The router and handlers live here rather than in the binary so
//! integration tests can drive them in-process via `tower::ServiceExt`.

pub mod api;
