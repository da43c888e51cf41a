//! Path prefix stripping.
//!
//! # Responsibilities
//! - Remove the configured prefix from inbound request paths
//! - Leave requests without the prefix unmodified

use std::task::{Context, Poll};

use axum::extract::Request;
use axum::http::Uri;
use tower::{Layer, Service};

/// Layer applying [`StripPrefix`] to the inner service.
#[derive(Debug, Clone)]
pub struct StripPrefixLayer {
    prefix: Option<String>,
}

impl StripPrefixLayer {
    /// An empty prefix disables stripping.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: (!prefix.is_empty()).then(|| prefix.to_string()),
        }
    }
}

impl<S> Layer<S> for StripPrefixLayer {
    type Service = StripPrefix<S>;

    fn layer(&self, inner: S) -> Self::Service {
        StripPrefix {
            inner,
            prefix: self.prefix.clone(),
        }
    }
}

/// Middleware removing a fixed prefix from inbound request paths.
#[derive(Debug, Clone)]
pub struct StripPrefix<S> {
    inner: S,
    prefix: Option<String>,
}

impl<S> Service<Request> for StripPrefix<S>
where
    S: Service<Request>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        if let Some(prefix) = &self.prefix {
            if let Some(stripped) = strip_prefix(request.uri(), prefix) {
                *request.uri_mut() = stripped;
            }
        }
        self.inner.call(request)
    }
}

/// Rebuild the URI with `prefix` removed from the path, preserving the query.
fn strip_prefix(uri: &Uri, prefix: &str) -> Option<Uri> {
    let rest = uri.path().strip_prefix(prefix)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        // "/proxyfoo" does not carry the prefix "/proxy".
        return None;
    }
    let path = if rest.is_empty() { "/" } else { rest };
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}
