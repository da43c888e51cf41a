//! Built-in handler relaying module paths to an upstream source.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use url::Url;

use crate::handler::RequestHandler;
use crate::transport::Transport;

/// Relays request paths onto a single upstream (`https`, `http`, or `file`).
///
/// Carries none of the proxy protocol itself: no version resolution, no
/// caching, no checksum verification. Those belong to whichever handler
/// replaces this one.
pub struct UpstreamRelay {
    upstream: Url,
    transport: Arc<Transport>,
}

impl UpstreamRelay {
    /// Create a relay for the given upstream, fetching through `transport`.
    pub fn new(mut upstream: Url, transport: Arc<Transport>) -> Self {
        // Joins replace the last path segment unless the base ends in '/'.
        if !upstream.path().ends_with('/') {
            let rooted = format!("{}/", upstream.path());
            upstream.set_path(&rooted);
        }
        Self {
            upstream,
            transport,
        }
    }

    fn target(&self, path: &str) -> Option<Url> {
        self.upstream.join(path.trim_start_matches('/')).ok()
    }
}

#[async_trait]
impl RequestHandler for UpstreamRelay {
    async fn handle(&self, request: Request) -> Response {
        if !matches!(*request.method(), Method::GET | Method::HEAD) {
            return StatusCode::METHOD_NOT_ALLOWED.into_response();
        }

        let Some(target) = self.target(request.uri().path()) else {
            return (StatusCode::BAD_REQUEST, "invalid module path").into_response();
        };

        match self.transport.fetch(request.method().clone(), &target).await {
            Ok(response) => response.into_response(),
            Err(e) => {
                tracing::error!(url = %target, error = %e, "upstream fetch failed");
                (StatusCode::BAD_GATEWAY, "upstream fetch failed").into_response()
            }
        }
    }
}
