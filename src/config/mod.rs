//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change (debounced, parent directory watched)
//!     → loader.rs loads new config, rejecting empty or routeless files
//!     → validation.rs validates
//!     → new route table sent to the HTTP server
//!     → atomic swap of Arc<Router>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{CsrfConfig, GateConfig, ListenerConfig, LogFormat, ObservabilityConfig, RouteConfig};
pub use validation::ValidationError;
