//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (filter by method, collect matching patterns)
//!     → matcher.rs (segment match, parameter capture, specificity)
//!     → Return: RouteMatch, MethodNotAllowed or NotFound
//!
//! Route Compilation (at startup):
//!     RouteTable::products()
//!     → Patterns compiled into segments
//!     → Shared via Arc, immutable
//! ```
//!
//! # Design Decisions
//! - Literal segments outrank parameters regardless of registration order
//! - Deterministic: same input always matches same route
//! - No regex in hot path

pub mod matcher;
pub mod router;

pub use matcher::{RoutePattern, Segment};
pub use router::{Resolution, RouteId, RouteMatch, RouteTable};
