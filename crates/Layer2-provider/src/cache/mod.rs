//! Cache decorator
//!
//! - `decorator.rs` - CachedProvider (세대 기반 무효화 메모 테이블)
//! - `stats.rs` - CacheStats

mod decorator;
mod stats;

pub use decorator::CachedProvider;
pub use stats::CacheStats;
