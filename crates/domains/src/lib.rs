//! rusty-board/crates/domains/src/lib.rs
//!
//! Domain models, error types and port definitions for the comment board.
//! Nothing in this crate performs I/O.

pub mod errors;
pub mod models;
pub mod policy;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use policy::*;
pub use ports::*;
