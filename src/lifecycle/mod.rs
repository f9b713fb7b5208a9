//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → every subscriber wakes → server stops accepting → drain
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → wait_for_termination() returns → Shutdown::trigger()
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
