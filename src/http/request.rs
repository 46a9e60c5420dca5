//! Request-side helpers shared by the pipeline stages.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4)
//! - Carry the matched route name between stages
//! - Parse the query string into a lookup table
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Route resolution happens once; later stages read the `MatchedRoute`
//!   and `RouteSnapshot` extensions instead of matching again

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::Router;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Request ID of a request, or `"unknown"` when none was assigned.
pub fn request_id<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Name of the route a request was resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute(pub String);

impl MatchedRoute {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The route table a request was resolved against. Later stages read route
/// options from this snapshot so a concurrent reload cannot split them from
/// the match.
#[derive(Debug, Clone)]
pub struct RouteSnapshot(pub Arc<Router>);

/// Decoded query parameters. When a key repeats, the first value wins.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// The parts of a request the CSRF guard looks at.
#[derive(Debug, Clone, Default)]
pub struct RequestView<'a> {
    pub route_id: Option<&'a str>,
    pub query: QueryParams,
}

impl<'a> RequestView<'a> {
    pub fn new(route_id: Option<&'a str>, query: QueryParams) -> Self {
        Self { route_id, query }
    }

    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        Self {
            route_id: req.extensions().get::<MatchedRoute>().map(MatchedRoute::as_str),
            query: QueryParams::parse(req.uri().query()),
        }
    }
}
