//! # lexline-provider
//!
//! Provider layer for Lexline.
//! Resolves lines to strings and resources through a uniform provider interface.
//!
//! ## Features
//! - Depth-first composite provider (first value wins, stable registration order)
//! - In-memory leaf provider keyed by structural line equality
//! - Memoizing cache decorator with generation-based invalidation
//! - Pattern-keyed table loading (`MemoryProvider::load_table`)

pub mod cache;
pub mod memory;
pub mod tree;

// Core types
pub use cache::{CacheStats, CachedProvider};
pub use memory::MemoryProvider;
pub use tree::CompositeProvider;
