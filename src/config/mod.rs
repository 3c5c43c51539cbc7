//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, or the flat JSON layout)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides
//!     → validation.rs (semantic checks)
//!     → CollectorConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config, validate, ConfigError};
pub use schema::{
    BrokerConfig, CollectorConfig, LoggingConfig, ObservabilityConfig, ProvisioningConfig,
    RetryConfig, ServerConfig,
};
