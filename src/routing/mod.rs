//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, method)
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: matched Route or None
//!
//! Route Compilation (at startup and on reload):
//!     RouteConfig[]
//!     → Sort by priority
//!     → Compile matchers
//!     → Freeze as immutable Router, published through ArcSwap
//! ```
//!
//! # Design Decisions
//! - Routes compiled up front, immutable once published
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by priority)
//! - Option lookups are a capability (`options.rs`), not a given

use std::sync::Arc;

use arc_swap::ArcSwap;

pub mod generator;
pub mod matcher;
pub mod options;
pub mod router;

pub use generator::{UrlGenerationError, UrlGenerator};
pub use options::{OptionValue, RouteOptions, RouteOptionsProvider, RouteResolver, CSRF_PROTECT};
pub use router::{Route, Router};

/// Route table shared between pipeline stages and swapped on reload.
pub type SharedRouter = Arc<ArcSwap<Router>>;

/// Wrap a compiled router for sharing.
pub fn shared(router: Router) -> SharedRouter {
    Arc::new(ArcSwap::from_pointee(router))
}
