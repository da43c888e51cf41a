//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Serve task exit ──┐
//!                   ├──▶ Shutdown (write-once) ──▶ graceful drain ──▶ exit
//! SIGINT/SIGTERM ───┘
//! ```
//!
//! # Design Decisions
//! - One trigger-once event; both origins converge on the same path
//! - Drain is bounded by the configured grace period; zero means unbounded

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownCause};
