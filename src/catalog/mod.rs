//! Product catalog subsystem.
//!
//! # Data Flow
//! ```text
//! JSON payload
//!     → validation.rs (required fields, exact types)
//!     → NewProduct / ProductPatch
//!     → store.rs (single mutex around the collection)
//!     → Product snapshot handed back to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - The store owns the collection; nothing outside it holds a reference
//! - Not-found is an `Option`/`bool`, never an error
//! - Ids are UUID v4 strings assigned on create and never changed

pub mod product;
pub mod store;
pub mod validation;

pub use product::{NewProduct, Price, Product, ProductPatch};
pub use store::{paginate, ProductStore};
pub use validation::{validate_create, validate_patch, ValidationError};
