//! URL generation for named routes.
//!
//! Links to routes flagged `csrf_protect` get the route's token appended as
//! `_csrf_token`, so a generated link passes the guard as-is.

use thiserror::Error;
use url::form_urlencoded;

use crate::csrf::{TokenProvider, CSRF_TOKEN_PARAM};
use crate::routing::router::Router;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlGenerationError {
    #[error("unknown route '{0}'")]
    UnknownRoute(String),
}

pub struct UrlGenerator<'a> {
    router: &'a Router,
    tokens: &'a dyn TokenProvider,
}

impl<'a> UrlGenerator<'a> {
    pub fn new(router: &'a Router, tokens: &'a dyn TokenProvider) -> Self {
        Self { router, tokens }
    }

    /// Path of `route_id` plus `params` as an urlencoded query. A
    /// caller-supplied `_csrf_token` is dropped; protected routes get a
    /// freshly generated one.
    pub fn generate(&self, route_id: &str, params: &[(&str, &str)]) -> Result<String, UrlGenerationError> {
        let route = self
            .router
            .route(route_id)
            .ok_or_else(|| UrlGenerationError::UnknownRoute(route_id.to_string()))?;

        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;
        for (key, value) in params.iter().filter(|(k, _)| *k != CSRF_TOKEN_PARAM) {
            query.append_pair(key, value);
            has_query = true;
        }

        if route.options.csrf_protect() {
            let token = self.tokens.generate(route_id);
            query.append_pair(CSRF_TOKEN_PARAM, token.as_str());
            has_query = true;
        }

        let path = route.path_prefix.as_deref().unwrap_or("/");
        if has_query {
            Ok(format!("{}?{}", path, query.finish()))
        } else {
            Ok(path.to_string())
        }
    }
}
