//! Request handler seam.
//!
//! The module-proxy logic proper lives behind [`RequestHandler`]; the server
//! only requires "request in, response out" plus cooperative cancellation.

pub mod relay;

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::Response;

pub use relay::UpstreamRelay;

/// The opaque request-handling capability fronted by the server.
///
/// Implementations must cooperate with cancellation: when the per-request
/// deadline fires the handler future is dropped, and any outbound work it
/// owns must stop with it.
#[async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    /// Produce a response for one inbound request.
    async fn handle(&self, request: Request) -> Response;
}
