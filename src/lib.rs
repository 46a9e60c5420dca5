//! Route-level CSRF protection for HTTP services.
//!
//! Requests resolved to a route whose options set `csrf_protect` must carry
//! a `_csrf_token` query parameter accepted by the configured token
//! provider; otherwise they are rejected with `400 Invalid CSRF token passed`
//! before reaching the route handler.

pub mod config;
pub mod csrf;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GateConfig;
pub use csrf::{CsrfError, CsrfRouteGuard, DigestTokenProvider, TokenProvider};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
