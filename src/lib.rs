//! Supervised HTTP front-end for Go module proxy handlers.
//!
//! The module resolution, caching, and checksum-database logic is opaque to
//! this crate: anything implementing [`handler::RequestHandler`] can sit
//! behind the server. What lives here is the lifecycle around that handler:
//! listener startup (plain or TLS), per-request deadlines, path-prefix
//! stripping, graceful shutdown on signal or serve failure, and the
//! restricted `file:` outbound transport for local module mirrors.
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │                  HttpServer                   │
//!  Client ────────┼─▶ trace ─▶ strip prefix ─▶ deadline ─▶ dispatch ─▶ RequestHandler
//!                 │                                               │        │
//!                 │  lifecycle: signal / serve-exit ─▶ Shutdown   │        ▼
//!                 │             graceful drain (bounded)          │    Transport
//!                 └──────────────────────────────────────────────┘   (http(s) | file:)
//! ```

pub mod config;
pub mod handler;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod transport;

pub use config::ServerConfig;
pub use handler::RequestHandler;
pub use http::{HttpServer, ServerError};
pub use lifecycle::Shutdown;
pub use transport::Transport;
