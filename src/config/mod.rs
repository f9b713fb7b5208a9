//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env (dotenvy, loaded by main)
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (PORT / HOST / API_KEY / LOG_LEVEL overrides, then --port)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::{
    AppConfig, AuthConfig, CatalogConfig, LimitsConfig, ListenerConfig, LogFormat,
    ObservabilityConfig,
};
