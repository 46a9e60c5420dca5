//! The CSRF route guard.
//!
//! Runs once per request, before the route handler. A request is only
//! inspected when it resolved to a route whose options carry a truthy
//! `csrf_protect`; such requests must present a `_csrf_token` query
//! parameter the token provider accepts for that route.

use std::sync::Arc;

use crate::csrf::error::CsrfError;
use crate::csrf::provider::TokenProvider;
use crate::csrf::token::CSRF_TOKEN_PARAM;
use crate::http::request::RequestView;
use crate::routing::options::RouteResolver;

/// Outcome of a guard check that did not reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// The route does not require a token (or no route matched).
    Skipped,
    /// The route is protected and the supplied token was valid.
    Passed,
}

#[derive(Clone)]
pub struct CsrfRouteGuard {
    tokens: Arc<dyn TokenProvider>,
}

impl CsrfRouteGuard {
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self { tokens }
    }

    /// Check one request against the route table it was resolved with.
    pub fn on_request(
        &self,
        resolver: &dyn RouteResolver,
        request: &RequestView<'_>,
    ) -> Result<GuardDecision, CsrfError> {
        let Some(route_id) = request.route_id else {
            return Ok(GuardDecision::Skipped);
        };

        let Some(provider) = resolver.options_provider() else {
            return Ok(GuardDecision::Skipped);
        };

        let protected = provider
            .route_options(route_id)
            .is_some_and(|options| options.csrf_protect());
        if !protected {
            return Ok(GuardDecision::Skipped);
        }

        // Stateful providers may need to register the expected token first.
        let _expected = self.tokens.generate(route_id);

        match request.query.get(CSRF_TOKEN_PARAM) {
            Some(token) if self.tokens.is_valid(route_id, token) => Ok(GuardDecision::Passed),
            _ => Err(CsrfError::InvalidCsrfToken),
        }
    }
}

impl std::fmt::Debug for CsrfRouteGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfRouteGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::csrf::token::CsrfToken;
    use crate::http::request::QueryParams;
    use crate::routing::options::{RouteOptions, RouteOptionsProvider, CSRF_PROTECT};

    /// Accepts exactly one (route, token) pair and records every call.
    #[derive(Default)]
    struct RecordingProvider {
        valid: Option<(String, String)>,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingProvider {
        fn accepting(route: &str, token: &str) -> Self {
            Self {
                valid: Some((route.into(), token.into())),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl TokenProvider for RecordingProvider {
        fn generate(&self, route_id: &str) -> CsrfToken {
            self.calls.lock().unwrap().push(format!("generate:{route_id}"));
            CsrfToken::new("expected")
        }

        fn is_valid(&self, route_id: &str, token: &str) -> bool {
            self.calls.lock().unwrap().push(format!("is_valid:{route_id}"));
            self.valid
                .as_ref()
                .is_some_and(|(r, t)| r == route_id && t == token)
        }
    }

    /// Route table with the options capability; counts lookups.
    #[derive(Default)]
    struct StaticRoutes {
        options: HashMap<String, RouteOptions>,
        lookups: Mutex<usize>,
    }

    impl StaticRoutes {
        fn with(mut self, route: &str, options: RouteOptions) -> Self {
            self.options.insert(route.into(), options);
            self
        }
    }

    impl RouteOptionsProvider for StaticRoutes {
        fn route_options(&self, route_id: &str) -> Option<&RouteOptions> {
            *self.lookups.lock().unwrap() += 1;
            self.options.get(route_id)
        }
    }

    impl RouteResolver for StaticRoutes {
        fn options_provider(&self) -> Option<&dyn RouteOptionsProvider> {
            Some(self)
        }
    }

    /// Route table without the options capability.
    struct OpaqueRoutes;
    impl RouteResolver for OpaqueRoutes {}

    fn protected() -> RouteOptions {
        [(CSRF_PROTECT, true)].into_iter().collect()
    }

    fn guard(provider: RecordingProvider) -> (CsrfRouteGuard, Arc<RecordingProvider>) {
        let provider = Arc::new(provider);
        (CsrfRouteGuard::new(provider.clone()), provider)
    }

    #[test]
    fn test_no_matched_route_is_noop() {
        let (guard, provider) = guard(RecordingProvider::default());
        let routes = StaticRoutes::default().with("checkout", protected());

        let view = RequestView::new(None, QueryParams::default());
        assert_eq!(guard.on_request(&routes, &view), Ok(GuardDecision::Skipped));
        assert_eq!(*routes.lookups.lock().unwrap(), 0);
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_router_without_options_capability() {
        let (guard, provider) = guard(RecordingProvider::default());
        let view = RequestView::new(Some("checkout"), QueryParams::default());
        assert_eq!(guard.on_request(&OpaqueRoutes, &view), Ok(GuardDecision::Skipped));
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_unprotected_route_ignores_query() {
        let (guard, provider) = guard(RecordingProvider::default());
        let routes = StaticRoutes::default().with("home", RouteOptions::new());

        for query in [QueryParams::default(), [("_csrf_token", "junk")].into_iter().collect()] {
            let view = RequestView::new(Some("home"), query);
            assert_eq!(guard.on_request(&routes, &view), Ok(GuardDecision::Skipped));
        }
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_falsy_flag_is_unprotected() {
        let (guard, _) = guard(RecordingProvider::default());
        let options: RouteOptions = [(CSRF_PROTECT, false)].into_iter().collect();
        let routes = StaticRoutes::default().with("home", options);

        let view = RequestView::new(Some("home"), QueryParams::default());
        assert_eq!(guard.on_request(&routes, &view), Ok(GuardDecision::Skipped));
    }

    #[test]
    fn test_unknown_route_is_noop() {
        let (guard, _) = guard(RecordingProvider::default());
        let routes = StaticRoutes::default();
        let view = RequestView::new(Some("gone"), QueryParams::default());
        assert_eq!(guard.on_request(&routes, &view), Ok(GuardDecision::Skipped));
    }

    #[test]
    fn test_protected_route_without_token() {
        let (guard, _) = guard(RecordingProvider::accepting("checkout", "abc"));
        let routes = StaticRoutes::default().with("checkout", protected());

        let view = RequestView::new(Some("checkout"), QueryParams::default());
        assert_eq!(guard.on_request(&routes, &view), Err(CsrfError::InvalidCsrfToken));
    }

    #[test]
    fn test_protected_route_with_invalid_token() {
        let (guard, _) = guard(RecordingProvider::accepting("checkout", "abc"));
        let routes = StaticRoutes::default().with("checkout", protected());

        let query = [("_csrf_token", "nope")].into_iter().collect();
        let view = RequestView::new(Some("checkout"), query);
        assert_eq!(guard.on_request(&routes, &view), Err(CsrfError::InvalidCsrfToken));
    }

    #[test]
    fn test_protected_route_with_valid_token() {
        let (guard, provider) = guard(RecordingProvider::accepting("checkout", "abc"));
        let routes = StaticRoutes::default().with("checkout", protected());

        let query = [("_csrf_token", "abc")].into_iter().collect();
        let view = RequestView::new(Some("checkout"), query);
        assert_eq!(guard.on_request(&routes, &view), Ok(GuardDecision::Passed));
        assert_eq!(
            provider.calls(),
            vec!["generate:checkout".to_string(), "is_valid:checkout".to_string()]
        );
    }

    #[test]
    fn test_token_for_other_route_rejected() {
        let (guard, _) = guard(RecordingProvider::accepting("profile", "abc"));
        let routes = StaticRoutes::default().with("checkout", protected());

        let query = [("_csrf_token", "abc")].into_iter().collect();
        let view = RequestView::new(Some("checkout"), query);
        assert_eq!(guard.on_request(&routes, &view), Err(CsrfError::InvalidCsrfToken));
    }
}
