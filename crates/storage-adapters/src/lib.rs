//! # storage-adapters
//!
//! Implementations of the `domains` ports. Only an in-memory repository
//! ships here; it can be seeded from a JSON file for local runs and tests.

pub mod memory;
pub mod seed;

pub use memory::InMemoryArticleRepository;
pub use seed::{load_seed, SeedData};
