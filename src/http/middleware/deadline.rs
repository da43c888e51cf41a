//! Per-request deadline enforcement.
//!
//! # Responsibilities
//! - Arm a deadline on every inbound request when a fetch timeout is set
//! - Pass requests through untouched when the timeout is zero
//! - Convert an expired deadline into 504 Gateway Timeout
//!
//! Cancellation is cooperative: when the deadline fires the downstream
//! future is dropped, which ends any outbound work it still owns.

use std::task::{Context, Poll};
use std::time::Duration;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

/// Layer applying [`Deadline`] to the inner service.
#[derive(Debug, Clone, Copy)]
pub struct DeadlineLayer {
    timeout: Option<Duration>,
}

impl DeadlineLayer {
    /// A zero duration disables the deadline entirely.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: (!timeout.is_zero()).then_some(timeout),
        }
    }
}

impl<S> Layer<S> for DeadlineLayer {
    type Service = Deadline<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Deadline {
            inner,
            timeout: self.timeout,
        }
    }
}

/// Middleware bounding the wall-clock duration of each request.
#[derive(Debug, Clone)]
pub struct Deadline<S> {
    inner: S,
    timeout: Option<Duration>,
}

impl<S> Service<Request> for Deadline<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let future = self.inner.call(request);
        let Some(timeout) = self.timeout else {
            return Box::pin(future);
        };
        Box::pin(async move {
            match tokio::time::timeout(timeout, future).await {
                Ok(result) => result,
                Err(_) => Ok(StatusCode::GATEWAY_TIMEOUT.into_response()),
            }
        })
    }
}
