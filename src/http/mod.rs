//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, query and body decoding)
//!     → security (X-API-Key check, /api only)
//!     → routing (RouteTable resolves method + path)
//!     → handlers.rs (store operation)
//!     → response.rs / error.rs (status + JSON body)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use server::{ApiServer, AppState};
