//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use csrf_gate::config::{GateConfig, RouteConfig};
use csrf_gate::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const SECRET: &str = "integration-secret";

/// Config with one protected and one open route.
pub fn gate_config() -> GateConfig {
    let mut config = GateConfig::default();
    config.csrf.secret = Some(SECRET.into());
    config.observability.metrics_enabled = false;

    let mut checkout = RouteConfig::with_prefix("checkout", "/checkout").csrf_protected();
    checkout.priority = 10;
    config.routes.push(checkout);
    config.routes.push(RouteConfig::with_prefix("home", "/"));
    config
}

/// A gate running on an ephemeral port.
pub struct RunningGate {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<GateConfig>,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl RunningGate {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a gate with `config` on 127.0.0.1:0.
pub async fn start_gate(config: GateConfig) -> RunningGate {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move { server.run(listener, config_updates, server_shutdown).await });

    // Give the accept loop a moment.
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningGate {
        addr,
        updates,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
