//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use axum::response::Response;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use modrelay::config::ServerConfig;
use modrelay::handler::RequestHandler;
use modrelay::http::{HttpServer, ServerError};

/// Handler that echoes the request path in the response body.
pub struct EchoHandler;

#[async_trait]
impl RequestHandler for EchoHandler {
    async fn handle(&self, request: Request) -> Response {
        Response::new(Body::from(request.uri().path().to_string()))
    }
}

/// Handler that sleeps before responding, for deadline and drain tests.
pub struct SlowHandler(pub Duration);

#[async_trait]
impl RequestHandler for SlowHandler {
    async fn handle(&self, request: Request) -> Response {
        tokio::time::sleep(self.0).await;
        Response::new(Body::from(request.uri().path().to_string()))
    }
}

/// Spawn a supervised server on an ephemeral port.
///
/// Returns the bound address, the simulated-signal trigger, and the join
/// handle carrying the run result.
pub async fn spawn_server(
    mut config: ServerConfig,
    handler: Arc<dyn RequestHandler>,
) -> (
    SocketAddr,
    oneshot::Sender<()>,
    JoinHandle<Result<(), ServerError>>,
) {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let server = HttpServer::new(config, handler);
    let handle = server.handle();

    let (trigger, triggered) = oneshot::channel();
    let task = tokio::spawn(server.run_until(async move {
        let _ = triggered.await;
    }));

    let addr = handle.listening().await.expect("server failed to start");
    (addr, trigger, task)
}
