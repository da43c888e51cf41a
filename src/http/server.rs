//! HTTP server supervision.
//!
//! # Responsibilities
//! - Build the axum router around the opaque request handler
//! - Serve plain or TLS depending on configuration
//! - Coordinate graceful shutdown between OS signals and serve-loop exit
//! - Surface the terminal error after best-effort drain
//!
//! Lifecycle: `Starting → Serving → ShuttingDown → Stopped`, exactly once
//! per run. The serve loop runs in a single background task; the foreground
//! blocks on the shutdown trigger.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use axum_server::Handle;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler::RequestHandler;
use crate::http::middleware::{DeadlineLayer, StripPrefixLayer};
use crate::http::tls::load_tls_config;
use crate::lifecycle::{signals, Shutdown, ShutdownCause};
use crate::observability::metrics;

/// Error type for a supervised server run.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The bind address did not resolve.
    #[error("cannot resolve listen address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: io::Error,
    },
    /// TLS material could not be loaded.
    #[error("failed to load TLS certificate/key: {0}")]
    Tls(#[source] io::Error),
    /// The serve loop or the shutdown phase failed.
    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// Application state injected into the dispatch handler.
#[derive(Clone)]
struct AppState {
    handler: Arc<dyn RequestHandler>,
}

/// Supervised HTTP server fronting a [`RequestHandler`].
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
    handle: Handle,
}

impl HttpServer {
    /// Create a new server around the given handler.
    pub fn new(config: ServerConfig, handler: Arc<dyn RequestHandler>) -> Self {
        let router = Self::build_router(&config, AppState { handler });
        Self {
            config,
            router,
            handle: Handle::new(),
        }
    }

    /// Build the axum router with all middleware layers.
    ///
    /// Layer order outermost-in: trace, prefix strip, deadline. The prefix
    /// is removed before the deadline is armed so the handler only ever
    /// observes stripped paths.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(DeadlineLayer::new(Duration::from_secs(
                config.timeouts.fetch_secs,
            )))
            .layer(StripPrefixLayer::new(&config.path_prefix))
            .layer(TraceLayer::new_for_http())
    }

    /// Handle for observing the bound address or requesting shutdown.
    ///
    /// Shutdown requests after the run has completed are no-ops.
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    /// Run until an OS termination signal or serve-loop failure.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(signals::shutdown_signal()).await
    }

    /// Run until `signal` resolves or the serve loop exits.
    ///
    /// Tests pass their own trigger future here instead of contending for
    /// process-global signal handlers.
    pub async fn run_until<F>(self, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = resolve_addr(&self.config.listener.bind_address).await?;

        let tls = match &self.config.listener.tls {
            Some(tls) => Some(
                load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path))
                    .await
                    .map_err(ServerError::Tls)?,
            ),
            None => None,
        };

        tracing::info!(address = %addr, tls = tls.is_some(), "server starting");

        let shutdown = Shutdown::new();
        let handle = self.handle.clone();
        let app = self.router.into_make_service();

        let serve_task = tokio::spawn({
            let shutdown = shutdown.clone();
            let handle = handle.clone();
            async move {
                let result = match tls {
                    Some(tls_config) => {
                        axum_server::bind_rustls(addr, tls_config)
                            .handle(handle)
                            .serve(app)
                            .await
                    }
                    None => axum_server::bind(addr).handle(handle).serve(app).await,
                };
                shutdown.trigger(ShutdownCause::ServeExit);
                result
            }
        });

        let signal_task = tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                signal.await;
                shutdown.trigger(ShutdownCause::Signal);
            }
        });

        // Serving. Block until exactly one trigger fires.
        let cause = shutdown.triggered().await;
        signal_task.abort();

        let grace = Duration::from_secs(self.config.timeouts.shutdown_secs);
        tracing::info!(?cause, grace_secs = grace.as_secs(), "shutting down");

        // No-op when the serve loop has already returned. Zero grace means
        // an unbounded drain; otherwise remaining connections are
        // force-closed at the deadline.
        handle.graceful_shutdown((!grace.is_zero()).then_some(grace));

        let result = match serve_task.await {
            Ok(result) => result,
            Err(e) => Err(io::Error::other(e)),
        };

        tracing::info!("server stopped");
        result.map_err(ServerError::Serve)
    }
}

/// Resolve a host:port string, taking the first address.
async fn resolve_addr(address: &str) -> Result<SocketAddr, ServerError> {
    let err = |source| ServerError::Address {
        address: address.to_string(),
        source,
    };
    let mut addrs = tokio::net::lookup_host(address).await.map_err(err)?;
    addrs
        .next()
        .ok_or_else(|| err(io::Error::new(io::ErrorKind::NotFound, "no addresses resolved")))
}

/// Hand the request to the opaque handler and record the outcome.
async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = state.handler.handle(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
