//! OS signal handling.
//!
//! # Responsibilities
//! - Translate SIGINT/SIGTERM into a shutdown trigger
//! - Keep registration scoped to the awaiting task
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - No process-global state: supervised servers in tests substitute their
//!   own trigger future instead of contending for signal handlers

/// Wait for a termination signal (SIGINT or SIGTERM).
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut interrupt =
            signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
        let mut terminate =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = interrupt.recv() => {}
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    }

    tracing::info!("termination signal received");
}
