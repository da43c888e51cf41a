//! Outbound transport subsystem.
//!
//! # Data Flow
//! ```text
//! handler fetch ──▶ Transport::fetch
//!                      ├── file: URL ──▶ FileTransport (restricted local read)
//!                      └── http(s) ────▶ reqwest client (connect timeout, keep-alive)
//! ```

pub mod builder;
pub mod file;

pub use builder::{Transport, TransportError};
pub use file::{FileTransport, FileTransportError};
