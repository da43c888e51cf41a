//! Outbound transport construction.
//!
//! # Responsibilities
//! - Build the single client used for every fetch the handler performs
//! - Enforce the connect timeout and keep-alive on new connections
//! - Route `file:` URLs to the restricted local file transport

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Response, StatusCode};
use percent_encoding::percent_decode_str;
use thiserror::Error;
use tokio_util::io::ReaderStream;
use url::Url;

use crate::transport::file::{FileTransport, FileTransportError};

/// Keep-alive interval applied to every outbound connection.
const KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Error type for outbound fetches.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The outbound client could not be constructed.
    #[error("failed to build outbound HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// DNS, connect, or TLS failure; propagated unchanged, never retried.
    #[error("outbound fetch failed: {0}")]
    Fetch(#[source] reqwest::Error),
    /// Local file retrieval failed.
    #[error(transparent)]
    File(#[from] FileTransportError),
    /// The upstream response could not be reassembled.
    #[error("invalid fetch response: {0}")]
    Response(#[from] axum::http::Error),
}

/// Single outbound transport shared by all concurrent requests.
///
/// Built once at startup and never mutated afterwards; concurrent requests
/// read through the same client.
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    files: FileTransport,
}

impl Transport {
    /// Build the transport.
    ///
    /// A zero `connect_timeout` means unlimited. `insecure` disables
    /// certificate verification on outbound TLS; accepting that risk is the
    /// caller's call, not an error.
    pub fn new(connect_timeout: Duration, insecure: bool) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .tcp_keepalive(KEEP_ALIVE)
            .danger_accept_invalid_certs(insecure);
        if !connect_timeout.is_zero() {
            builder = builder.connect_timeout(connect_timeout);
        }
        let client = builder.build().map_err(TransportError::Client)?;
        Ok(Self {
            client,
            files: FileTransport,
        })
    }

    /// Fetch a URL, dispatching `file:` to the local file transport.
    ///
    /// `HEAD` is forwarded as-is so upstreams and the filesystem never pay
    /// for a body nobody reads.
    pub async fn fetch(&self, method: Method, url: &Url) -> Result<Response<Body>, TransportError> {
        if url.scheme() == "file" {
            // The URL path component is percent-encoded; the filesystem
            // wants the decoded form.
            let path = percent_decode_str(url.path()).decode_utf8().map_err(|_| {
                FileTransportError::InvalidPath {
                    path: url.path().to_string(),
                    reason: "path is not valid UTF-8",
                }
            })?;
            let file = self.files.open(&path).await?;

            let mut response = Response::builder().status(StatusCode::OK);
            if let Ok(meta) = file.metadata().await {
                response = response.header(header::CONTENT_LENGTH, meta.len());
            }
            let body = if method == Method::HEAD {
                Body::empty()
            } else {
                Body::from_stream(ReaderStream::new(file))
            };
            return Ok(response.body(body)?);
        }

        let upstream = self
            .client
            .request(method, url.clone())
            .send()
            .await
            .map_err(TransportError::Fetch)?;

        let mut response = Response::builder().status(upstream.status());
        if let Some(headers) = response.headers_mut() {
            *headers = upstream.headers().clone();
        }
        Ok(response.body(Body::from_stream(upstream.bytes_stream()))?)
    }
}
