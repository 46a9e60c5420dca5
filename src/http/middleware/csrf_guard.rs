//! CSRF guard stage.
//! Rejects requests to protected routes that lack a valid token.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::csrf::{CsrfRouteGuard, GuardDecision};
use crate::http::request::{request_id, RequestView, RouteSnapshot};
use crate::observability::metrics;
use crate::routing::SharedRouter;

/// State required by the guard stage.
#[derive(Clone, Debug)]
pub struct CsrfGuardState {
    pub guard: CsrfRouteGuard,
    pub routes: SharedRouter,
}

pub async fn csrf_guard_middleware(
    State(state): State<CsrfGuardState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // Options must come from the table the route was matched against.
    let router = match req.extensions().get::<RouteSnapshot>() {
        Some(snapshot) => snapshot.0.clone(),
        None => state.routes.load_full(),
    };
    let (route, decision) = {
        let view = RequestView::from_request(&req);
        let route = view.route_id.unwrap_or("none").to_string();
        (route, state.guard.on_request(&*router, &view))
    };

    match decision {
        Ok(GuardDecision::Skipped) => next.run(req).await,
        Ok(GuardDecision::Passed) => {
            metrics::record_csrf_check(&route, "passed");
            next.run(req).await
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id(&req),
                route = %route,
                path = %req.uri().path(),
                "Rejected request with missing or invalid CSRF token"
            );
            metrics::record_csrf_check(&route, "rejected");
            e.into_response()
        }
    }
}
