//! Security subsystem.
//!
//! # Design Decisions
//! - A single shared secret compared by exact string equality
//! - Applied as a layer on the `/api` router; the root route stays public
//! - The secret never appears in logs or `Debug` output

pub mod api_key;

pub use api_key::{require_api_key, ApiKeyAuthenticator, AuthDecision, API_KEY_HEADER};
