//! Configuration subsystem.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ListenerConfig, ObservabilityConfig, ServerConfig, TimeoutConfig, TlsConfig, TransportConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
