//! Observability subsystem (logging, metrics).

pub mod logging;
pub mod metrics;
