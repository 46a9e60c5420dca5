//! CSRF protection for routes that opt in through their options.
//!
//! # Data Flow
//! ```text
//! Request (with MatchedRoute extension)
//!     → guard.rs (route options lookup, `csrf_protect` check)
//!     → provider.rs (generate expected token, validate supplied token)
//!     → Ok: continue to handler
//!     → Err: error.rs (400 "Invalid CSRF token passed")
//! ```

pub mod error;
pub mod guard;
pub mod provider;
pub mod token;

pub use error::CsrfError;
pub use guard::{CsrfRouteGuard, GuardDecision};
pub use provider::{DigestTokenProvider, TokenProvider};
pub use token::{CsrfToken, CSRF_TOKEN_PARAM};
