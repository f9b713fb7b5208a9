//! Product catalog HTTP service.
//!
//! CRUD over an in-memory product collection, guarded by a static API key.

pub mod catalog;
pub mod config;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use catalog::{Product, ProductStore};
pub use config::AppConfig;
pub use http::ApiServer;
pub use lifecycle::Shutdown;
