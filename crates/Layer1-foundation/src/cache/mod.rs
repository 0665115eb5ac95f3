//! Cache utilities
//!
//! 메모이제이션 데코레이터(Layer2-provider)가 사용하는 기본 도구:
//! - `LruCache`: 용량 제한 메모 테이블
//! - `compute_hash` / `combine_*`: 구조적 키 해시 조합

mod hash;
mod lru;

pub use hash::{combine_ordered, combine_unordered, compute_hash};
pub use lru::LruCache;
