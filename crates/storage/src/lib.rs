//! Cache abstraction and implementations for EV Tracker.
//!
//! This crate provides a trait-based key-value interface used to carry
//! resolved progress between pages, with in-memory and JSON file backends,
//! and a facade that never propagates backend failures.

#![warn(missing_docs)]

pub mod trait_;
pub mod memory;
#[cfg(feature = "json")]
pub mod json_storage;
pub mod cache;

pub use trait_::{CacheBackend, CacheError, Result};
pub use memory::MemoryCache;
#[cfg(feature = "json")]
pub use json_storage::{CacheEntry, JsonFileCache};
pub use cache::ProgressCache;
