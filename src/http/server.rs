//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the route handler
//! - Wire up middleware (tracing, request ID, timeout, route match, CSRF guard)
//! - Bind server to listener
//! - Swap the route table when a new configuration arrives
//! - Stop on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GateConfig;
use crate::csrf::{CsrfRouteGuard, DigestTokenProvider, TokenProvider};
use crate::http::middleware::{csrf_guard_middleware, route_match_middleware, CsrfGuardState};
use crate::http::request::{request_id, MakeRequestUuidV4, MatchedRoute, X_REQUEST_ID};
use crate::routing::{self, Router as RouteTable, SharedRouter};

/// HTTP server fronting the configured routes.
pub struct HttpServer {
    router: Router,
    routes: SharedRouter,
}

impl HttpServer {
    /// Create a new HTTP server with the token provider described by `config`.
    pub fn new(config: GateConfig) -> Self {
        let tokens = Arc::new(DigestTokenProvider::from_config(&config.csrf));
        Self::with_token_provider(config, tokens)
    }

    /// Create a new HTTP server with a caller-supplied token provider.
    pub fn with_token_provider(config: GateConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        let routes = routing::shared(RouteTable::from_config(config.routes.clone()));
        let guard = CsrfRouteGuard::new(tokens);

        let router = Self::build_router(&config, routes.clone(), guard);
        Self { router, routes }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GateConfig, routes: SharedRouter, guard: CsrfRouteGuard) -> Router {
        let guard_state = CsrfGuardState {
            guard,
            routes: routes.clone(),
        };

        Router::new()
            .fallback(route_handler)
            .layer(from_fn_with_state(guard_state, csrf_guard_middleware))
            .layer(from_fn_with_state(routes, route_match_middleware))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
            .layer(TraceLayer::new_for_http())
    }

    /// The assembled application, for serving or in-process testing.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Live route table.
    pub fn routes(&self) -> &SharedRouter {
        &self.routes
    }

    /// Replace the route table. Other settings only apply on restart.
    pub fn reload(&self, config: &GateConfig) {
        apply_routes(&self.routes, config);
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GateConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.load().route_count(),
            "HTTP server starting"
        );

        let routes = self.routes.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                apply_routes(&routes, &config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn apply_routes(routes: &SharedRouter, config: &GateConfig) {
    let table = RouteTable::from_config(config.routes.clone());
    let count = table.route_count();
    routes.store(Arc::new(table));
    tracing::info!(routes = count, "Route table reloaded");
}

/// Terminal handler: reports the matched route.
async fn route_handler(req: Request<Body>) -> Response {
    let request_id = request_id(&req).to_string();

    match req.extensions().get::<MatchedRoute>() {
        Some(route) => Json(json!({
            "route": route.as_str(),
            "request_id": request_id,
        }))
        .into_response(),
        None => {
            tracing::warn!(request_id = %request_id, path = %req.uri().path(), "No route matched");
            (StatusCode::NOT_FOUND, "No matching route found").into_response()
        }
    }
}
