//! HTTP middleware for request processing and protection.
//!
//! Provides the per-request auth context, rate limiting, request
//! correlation, and tracing middleware.

pub mod auth_context;
pub mod rate_limit;
pub mod request_id;
pub mod tracing;
