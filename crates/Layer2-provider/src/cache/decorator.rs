//! Cached Provider - 메모이제이션 데코레이터
//!
//! 카테고리(문자열, 리소스, 키 목록, 컬처 목록)마다 메모 테이블을 두고,
//! 모든 테이블이 하나의 세대(generation) 카운터 아래에 있다.
//!
//! ## Invalidation
//!
//! ```text
//! invalidate():  generation += 1  →  각 테이블을 락 아래에서 비움
//! miss path:     g = generation  →  inner 조회  →  (락) generation == g 일 때만 저장
//! ```
//!
//! - invalidate가 반환된 뒤 시작한 조회는 이전 세대의 값을 보지 못한다.
//! - invalidate 이전에 시작한 조회는 이전 값을 반환할 수 있지만 새 세대에 저장하지는 못한다.
//! - 엔트리는 세대를 함께 기록하므로 hit도 현재 세대와 일치할 때만 인정된다.

use super::stats::{CacheStats, Counters};
use lexline_foundation::{
    CacheSettings, Enumeration, KeyComparer, Line, LineKey, LineProvider, LineResource,
    LineResult, LineString, LruCache, ProviderFault,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone)]
struct Entry<V> {
    generation: u64,
    value: V,
}

type PointTable<T> = Mutex<LruCache<LineKey, Entry<LineResult<T>>>>;
type SetSlot<T> = Mutex<Option<Entry<Enumeration<T>>>>;

/// 캐싱 provider
pub struct CachedProvider {
    name: String,
    inner: Arc<dyn LineProvider>,
    comparer: Arc<KeyComparer>,
    settings: CacheSettings,
    generation: AtomicU64,
    strings: PointTable<Arc<str>>,
    resources: PointTable<Arc<[u8]>>,
    keys: SetSlot<Line>,
    cultures: SetSlot<String>,
    counters: Counters,
}

impl CachedProvider {
    pub fn new(inner: Arc<dyn LineProvider>, comparer: Arc<KeyComparer>) -> Self {
        Self::with_settings(inner, comparer, CacheSettings::default())
    }

    pub fn with_settings(
        inner: Arc<dyn LineProvider>,
        comparer: Arc<KeyComparer>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            name: format!("cached({})", inner.name()),
            inner,
            comparer,
            strings: Mutex::new(LruCache::new(settings.max_entries)),
            resources: Mutex::new(LruCache::new(settings.max_entries)),
            keys: Mutex::new(None),
            cultures: Mutex::new(None),
            settings,
            generation: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    pub fn inner(&self) -> &Arc<dyn LineProvider> {
        &self.inner
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> CacheStats {
        let (entries, evictions) = {
            let strings = self.strings.lock();
            let resources = self.resources.lock();
            (
                strings.len() + resources.len(),
                strings.evictions() + resources.evictions(),
            )
        };
        self.counters.snapshot(self.generation(), entries, evictions)
    }

    /// 모든 메모 테이블을 무효화
    ///
    /// 반환 후 시작되는 조회는 이전 세대의 엔트리를 보지 못한다.
    pub fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.strings.lock().clear();
        self.resources.lock().clear();
        *self.keys.lock() = None;
        *self.cultures.lock() = None;
        Counters::bump(&self.counters.invalidations);
        info!(provider = %self.name, generation, "Cache invalidated");
    }

    fn should_store<T>(&self, result: &LineResult<T>) -> bool {
        !result.is_fault() || self.settings.cache_faults
    }

    // ========================================================================
    // Point lookups
    // ========================================================================

    fn lookup<T: Clone>(
        &self,
        table: &PointTable<T>,
        key: &Line,
        fetch: impl FnOnce() -> LineResult<T>,
    ) -> LineResult<T> {
        let cache_key = self.comparer.key(key);
        let generation = self.generation();

        if let Some(entry) = table.lock().get(&cache_key) {
            if entry.generation == generation {
                Counters::bump(&self.counters.hits);
                trace!(provider = %self.name, key = %key, "Cache hit");
                return entry.value.clone().with_key(key.clone());
            }
        }

        Counters::bump(&self.counters.misses);
        trace!(provider = %self.name, key = %key, "Cache miss");
        let result = fetch();

        if self.should_store(&result) {
            let mut table = table.lock();
            if self.generation() == generation {
                table.insert(cache_key, Entry {
                    generation,
                    value: result.clone(),
                });
            } else {
                Counters::bump(&self.counters.stale_discards);
                debug!(provider = %self.name, key = %key, "Discarding result fetched before invalidation");
            }
        }
        result
    }

    // ========================================================================
    // Set-valued lookups
    // ========================================================================

    fn lookup_set<T: Clone>(
        &self,
        slot: &SetSlot<T>,
        what: &'static str,
        fetch: impl FnOnce() -> Enumeration<T>,
    ) -> Enumeration<T> {
        let generation = self.generation();

        if let Some(entry) = &*slot.lock() {
            if entry.generation == generation {
                Counters::bump(&self.counters.hits);
                trace!(provider = %self.name, what, "Cache hit");
                return entry.value.clone();
            }
        }

        Counters::bump(&self.counters.misses);
        let value = fetch();

        if value.is_ok() || self.settings.cache_faults {
            let mut slot = slot.lock();
            if self.generation() == generation {
                *slot = Some(Entry {
                    generation,
                    value: value.clone(),
                });
            } else {
                Counters::bump(&self.counters.stale_discards);
                debug!(provider = %self.name, what, "Discarding enumeration fetched before invalidation");
            }
        }
        value
    }
}

impl LineProvider for CachedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_string(&self, key: &Line) -> LineString {
        if !self.settings.strings {
            return self.inner.resolve_string(key);
        }
        self.lookup(&self.strings, key, || self.inner.resolve_string(key))
    }

    fn resolve_resource(&self, key: &Line) -> LineResource {
        if !self.settings.resources {
            return self.inner.resolve_resource(key);
        }
        self.lookup(&self.resources, key, || self.inner.resolve_resource(key))
    }

    fn keys(&self) -> Enumeration<Line> {
        if !self.settings.keys {
            return self.inner.keys();
        }
        self.lookup_set(&self.keys, "keys", || self.inner.keys())
    }

    fn cultures(&self) -> Enumeration<String> {
        if !self.settings.cultures {
            return self.inner.cultures();
        }
        self.lookup_set(&self.cultures, "cultures", || self.inner.cultures())
    }

    /// 내부 provider를 reload한 뒤 메모 테이블을 비운다 (reload 실패와 무관하게 무효화)
    fn reload(&self) -> std::result::Result<(), ProviderFault> {
        let reloaded = self.inner.reload();
        if let Err(fault) = &reloaded {
            warn!(provider = %self.name, %fault, "Inner reload failed");
        }
        self.invalidate();
        reloaded
    }
}
