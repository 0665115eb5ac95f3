//! 통합 테스트 공용 provider 더블

#![allow(dead_code)]

use lexline_foundation::{
    logging, Enumeration, KeyComparer, Line, LineProvider, LineResult, LineString, ProviderFault,
};
use lexline_provider::MemoryProvider;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

pub fn init_tracing() {
    logging::init_test_tracing();
}

pub fn comparer() -> Arc<KeyComparer> {
    Arc::new(KeyComparer::default())
}

/// 조회 순서를 기록하는 공유 로그
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, name: &str) {
        self.0.lock().push(name.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

/// MemoryProvider를 감싸 호출 횟수와 순서를 기록
pub struct TracingProvider {
    name: String,
    pub memory: MemoryProvider,
    log: CallLog,
    calls: AtomicUsize,
}

impl TracingProvider {
    pub fn new(name: &str, log: CallLog) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            memory: MemoryProvider::new(name, comparer()),
            log,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn with_string(self: Arc<Self>, key: Line, value: &str) -> Arc<Self> {
        self.memory.insert_string(key, value);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LineProvider for TracingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_string(&self, key: &Line) -> LineString {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.record(&self.name);
        self.memory.resolve_string(key)
    }

    fn keys(&self) -> Enumeration<Line> {
        self.memory.keys()
    }

    fn cultures(&self) -> Enumeration<String> {
        self.memory.cultures()
    }
}

/// 항상 fault를 내는 provider
pub struct FaultyProvider {
    log: CallLog,
}

impl FaultyProvider {
    pub fn new(log: CallLog) -> Arc<Self> {
        Arc::new(Self { log })
    }
}

impl LineProvider for FaultyProvider {
    fn name(&self) -> &str {
        "faulty"
    }

    fn resolve_string(&self, key: &Line) -> LineString {
        self.log.record("faulty");
        LineResult::fault(key.clone(), ProviderFault::new("faulty", "backing store unavailable"))
    }

    fn reload(&self) -> Result<(), ProviderFault> {
        Err(ProviderFault::new("faulty", "reload failed"))
    }
}

/// 원본 버전이 바뀌는 provider (`v{version}`을 반환)
#[derive(Default)]
pub struct VersionedProvider {
    version: AtomicU64,
    calls: AtomicUsize,
}

impl VersionedProvider {
    pub fn bump(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LineProvider for VersionedProvider {
    fn name(&self) -> &str {
        "versioned"
    }

    fn resolve_string(&self, key: &Line) -> LineString {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let version = self.version.load(Ordering::SeqCst);
        // 느린 원본을 흉내내어 invalidate와 겹치게 한다
        std::thread::yield_now();
        LineResult::resolved(key.clone(), Arc::from(format!("v{}", version)))
    }
}

/// `v12` → 12
pub fn version_of(result: &LineString) -> u64 {
    result
        .as_str()
        .and_then(|v| v.strip_prefix('v'))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
