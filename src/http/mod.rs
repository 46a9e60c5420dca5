//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing, request ID, timeout)
//!     → middleware/route_match.rs (resolve route, attach MatchedRoute)
//!     → middleware/csrf_guard.rs (reject protected routes without a valid token)
//!     → server.rs route handler
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use request::{MatchedRoute, QueryParams, RequestView, X_REQUEST_ID};
pub use server::HttpServer;
