//! Cache statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// Cache statistics for monitoring
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// 유효한 엔트리로 응답한 횟수
    pub hits: u64,
    /// 내부 provider로 위임한 횟수
    pub misses: u64,
    /// invalidate 호출 횟수
    pub invalidations: u64,
    /// 조회 도중 invalidate가 일어나 저장하지 않고 버린 결과 수
    pub stale_discards: u64,
    /// 현재 세대
    pub generation: u64,
    /// 현재 point lookup 엔트리 수
    pub entries: usize,
    /// `max_entries` 제한으로 축출된 엔트리 수
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate overall hit rate
    #[inline]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

/// 락 없이 갱신되는 카운터
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub invalidations: AtomicU64,
    pub stale_discards: AtomicU64,
}

impl Counters {
    #[inline]
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, generation: u64, entries: usize, evictions: u64) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            stale_discards: self.stale_discards.load(Ordering::Relaxed),
            generation,
            entries,
            evictions,
        }
    }
}
