//! HTTP serving subsystem.
//!
//! # Responsibilities
//! - Assemble the middleware stack around the opaque handler
//! - Supervise the listener lifecycle (plain and TLS)

pub mod middleware;
pub mod server;
pub mod tls;

pub use server::{HttpServer, ServerError};
