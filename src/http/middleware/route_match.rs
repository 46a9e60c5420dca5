//! Route resolution stage.
//! Resolves each request against the current route table once and records
//! the result, together with the table it was resolved against, as request
//! extensions for later stages. Also the outermost stage that knows the
//! route, so request count and latency are recorded here.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::{request_id, MatchedRoute, RouteSnapshot};
use crate::observability::metrics;
use crate::routing::SharedRouter;

pub async fn route_match_middleware(
    State(routes): State<SharedRouter>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let table = routes.load_full();

    let matched = table.match_request(&req).map(|r| r.name.clone());
    let label = matched.clone().unwrap_or_else(|| "none".to_string());
    match matched {
        Some(name) => {
            tracing::debug!(
                request_id = %request_id(&req),
                route = %name,
                path = %req.uri().path(),
                "Route matched"
            );
            req.extensions_mut().insert(MatchedRoute(name));
        }
        None => {
            tracing::debug!(
                request_id = %request_id(&req),
                path = %req.uri().path(),
                "No route matched"
            );
        }
    }
    req.extensions_mut().insert(RouteSnapshot(table));

    let response = next.run(req).await;
    metrics::record_request(&label, response.status().as_u16(), start_time);
    response
}
