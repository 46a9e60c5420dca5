//! Pipeline stages that run before route handlers.
//!
//! Order, outermost first: `route_match` then `csrf_guard`.

pub mod csrf_guard;
pub mod route_match;

pub use csrf_guard::{csrf_guard_middleware, CsrfGuardState};
pub use route_match::route_match_middleware;
