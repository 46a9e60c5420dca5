//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up matching route for request
//! - Answer per-route option lookups by route name
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) option lookup via HashMap keyed by route name
//! - O(n) match scan (acceptable for typical route counts)
//! - Explicit `None` rather than silent default

use std::collections::HashMap;

use axum::body::Body;
use axum::http::{Method, Request};

use crate::config::RouteConfig;
use crate::routing::matcher::{AndMatcher, HostMatcher, Matcher, MethodMatcher, PathPrefixMatcher};
use crate::routing::options::{RouteOptions, RouteOptionsProvider, RouteResolver};

/// A compiled route.
#[derive(Debug)]
pub struct Route {
    pub name: String,
    pub path_prefix: Option<String>,
    pub priority: u32,
    pub options: RouteOptions,
    matcher: AndMatcher,
}

impl Route {
    fn compile(config: RouteConfig) -> Self {
        let mut matchers: Vec<Box<dyn Matcher>> = Vec::new();

        if let Some(host) = &config.host {
            matchers.push(Box::new(HostMatcher::new(host.clone())));
        }
        if let Some(prefix) = &config.path_prefix {
            matchers.push(Box::new(PathPrefixMatcher::new(prefix.clone())));
        }
        if !config.methods.is_empty() {
            let methods = config
                .methods
                .iter()
                .filter_map(|m| match Method::from_bytes(m.to_ascii_uppercase().as_bytes()) {
                    Ok(method) => Some(method),
                    Err(_) => {
                        tracing::warn!(route = %config.name, method = %m, "Ignoring invalid method");
                        None
                    }
                })
                .collect();
            matchers.push(Box::new(MethodMatcher::new(methods)));
        }

        Self {
            name: config.name,
            path_prefix: config.path_prefix,
            priority: config.priority,
            options: config.options,
            matcher: AndMatcher::new(matchers),
        }
    }

    pub fn matches(&self, req: &Request<Body>) -> bool {
        self.matcher.matches(req)
    }
}

/// The compiled route table.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
    by_name: HashMap<String, usize>,
}

impl Router {
    /// Compile routes from configuration. Higher priority routes are checked
    /// first; equal priorities keep their configured order.
    pub fn from_config(configs: Vec<RouteConfig>) -> Self {
        let mut routes: Vec<Route> = configs.into_iter().map(Route::compile).collect();
        routes.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut by_name = HashMap::with_capacity(routes.len());
        for (idx, route) in routes.iter().enumerate() {
            by_name.entry(route.name.clone()).or_insert(idx);
        }

        tracing::debug!(routes = routes.len(), "Route table compiled");
        Self { routes, by_name }
    }

    /// First route whose conditions all match the request.
    pub fn match_request(&self, req: &Request<Body>) -> Option<&Route> {
        self.routes.iter().find(|r| r.matches(req))
    }

    /// Route by name.
    pub fn route(&self, name: &str) -> Option<&Route> {
        self.by_name.get(name).map(|&idx| &self.routes[idx])
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

impl RouteOptionsProvider for Router {
    fn route_options(&self, route_id: &str) -> Option<&RouteOptions> {
        self.route(route_id).map(|r| &r.options)
    }
}

impl RouteResolver for Router {
    fn options_provider(&self) -> Option<&dyn RouteOptionsProvider> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::default())
            .unwrap()
    }

    #[test]
    fn test_priority_order() {
        let mut checkout = RouteConfig::with_prefix("checkout", "/checkout").csrf_protected();
        checkout.priority = 10;
        let router = Router::from_config(vec![RouteConfig::with_prefix("home", "/"), checkout]);

        let matched = router.match_request(&request(Method::POST, "/checkout/pay")).unwrap();
        assert_eq!(matched.name, "checkout");

        let matched = router.match_request(&request(Method::GET, "/about")).unwrap();
        assert_eq!(matched.name, "home");
    }

    #[test]
    fn test_no_match() {
        let router = Router::from_config(vec![RouteConfig::with_prefix("api", "/api")]);
        assert!(router.match_request(&request(Method::GET, "/other")).is_none());
    }

    #[test]
    fn test_method_condition() {
        let mut submit = RouteConfig::with_prefix("submit", "/form");
        submit.methods = vec!["post".into()];
        let router = Router::from_config(vec![submit]);

        assert!(router.match_request(&request(Method::POST, "/form")).is_some());
        assert!(router.match_request(&request(Method::GET, "/form")).is_none());
    }

    #[test]
    fn test_options_capability() {
        let router = Router::from_config(vec![
            RouteConfig::with_prefix("checkout", "/checkout").csrf_protected(),
            RouteConfig::with_prefix("home", "/"),
        ]);

        let provider = router.options_provider().expect("router exposes options");
        assert!(provider.route_options("checkout").unwrap().csrf_protect());
        assert!(!provider.route_options("home").unwrap().csrf_protect());
        assert!(provider.route_options("missing").is_none());
    }
}
