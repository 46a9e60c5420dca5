//! Token providers.
//!
//! # Responsibilities
//! - Produce the expected token for a route identifier
//! - Decide whether a supplied token is valid for a route identifier
//!
//! # Design Decisions
//! - Tokens are derived, not stored: SHA-256 over a process secret and the
//!   route name, so any worker can validate without shared state
//! - A missing secret is replaced by 32 random bytes from the OS RNG

use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::config::CsrfConfig;
use crate::csrf::token::CsrfToken;

/// Generates and validates route-scoped tokens.
pub trait TokenProvider: Send + Sync {
    /// The token a client must present for `route_id`.
    fn generate(&self, route_id: &str) -> CsrfToken;

    /// Whether `token` is acceptable for `route_id`.
    fn is_valid(&self, route_id: &str, token: &str) -> bool;
}

/// Deterministic provider: `hex(sha256(secret ":" route_id))`.
pub struct DigestTokenProvider {
    secret: Vec<u8>,
}

impl DigestTokenProvider {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Provider with a per-process random secret.
    pub fn random() -> Self {
        let mut secret = [0u8; 32];
        OsRng.fill_bytes(&mut secret);
        Self {
            secret: secret.to_vec(),
        }
    }

    /// Build from configuration, falling back to a random secret.
    pub fn from_config(config: &CsrfConfig) -> Self {
        match config.secret.as_deref() {
            Some(secret) => Self::new(secret),
            None => {
                tracing::warn!("No csrf.secret configured; tokens will not survive a restart");
                Self::random()
            }
        }
    }
}

impl TokenProvider for DigestTokenProvider {
    fn generate(&self, route_id: &str) -> CsrfToken {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(b":");
        hasher.update(route_id.as_bytes());
        CsrfToken::new(hex::encode(hasher.finalize()))
    }

    fn is_valid(&self, route_id: &str, token: &str) -> bool {
        self.generate(route_id).matches(token)
    }
}
