//! Memory Provider - 메모리 내 리프 provider
//!
//! 구조적 키(`LineKey`)로 문자열과 바이트 리소스를 저장한다.
//! 임베딩 앱이 직접 채우거나, 패턴으로 키 문자열을 파싱해 테이블을 적재한다.

use lexline_foundation::{
    names, Enumeration, KeyComparer, Line, LineKey, LineProvider, LineResource, LineResult,
    LineString,
};
use lexline_pattern::LinePattern;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

type Table<V> = HashMap<LineKey, (Line, V)>;

pub struct MemoryProvider {
    name: String,
    comparer: Arc<KeyComparer>,
    strings: RwLock<Table<Arc<str>>>,
    resources: RwLock<Table<Arc<[u8]>>>,
}

impl MemoryProvider {
    pub fn new(name: impl Into<String>, comparer: Arc<KeyComparer>) -> Self {
        Self {
            name: name.into(),
            comparer,
            strings: RwLock::new(HashMap::new()),
            resources: RwLock::new(HashMap::new()),
        }
    }

    /// 패턴으로 키 문자열을 파싱해 문자열 테이블을 채운 provider
    pub fn from_pattern_table<I, K, V>(
        name: impl Into<String>,
        comparer: Arc<KeyComparer>,
        pattern: &LinePattern,
        entries: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Arc<str>>,
    {
        let provider = Self::new(name, comparer);
        provider.load_table(pattern, entries);
        provider
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// 문자열 저장. 구조적으로 같은 키가 있으면 교체하고 이전 값을 반환.
    pub fn insert_string(&self, key: Line, value: impl Into<Arc<str>>) -> Option<Arc<str>> {
        let cache_key = self.comparer.key(&key);
        self.strings
            .write()
            .insert(cache_key, (key, value.into()))
            .map(|(_, previous)| previous)
    }

    pub fn insert_resource(&self, key: Line, value: impl Into<Arc<[u8]>>) -> Option<Arc<[u8]>> {
        let cache_key = self.comparer.key(&key);
        self.resources
            .write()
            .insert(cache_key, (key, value.into()))
            .map(|(_, previous)| previous)
    }

    /// 두 테이블에서 키 제거. 하나라도 있었으면 true.
    pub fn remove(&self, key: &Line) -> bool {
        let cache_key = self.comparer.key(key);
        let string = self.strings.write().remove(&cache_key).is_some();
        let resource = self.resources.write().remove(&cache_key).is_some();
        string || resource
    }

    pub fn clear(&self) {
        self.strings.write().clear();
        self.resources.write().clear();
    }

    /// `키 문자열 → 값` 쌍을 패턴으로 파싱해 적재. 적재된 개수를 반환.
    pub fn load_table<I, K, V>(&self, pattern: &LinePattern, entries: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Arc<str>>,
    {
        self.load_table_onto(&Line::root(), pattern, entries)
    }

    /// 기존 라인(예: `Culture=de`) 뒤에 파싱한 키를 이어 붙여 적재
    pub fn load_table_onto<I, K, V>(&self, base: &Line, pattern: &LinePattern, entries: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Arc<str>>,
    {
        let mut loaded = 0usize;
        let mut skipped = 0usize;

        for (text, value) in entries {
            match pattern.parse_onto(base, text.as_ref()) {
                Ok(key) => {
                    self.insert_string(key, value);
                    loaded += 1;
                }
                Err(err) => {
                    skipped += 1;
                    debug!(provider = %self.name, key = text.as_ref(), error = %err, "Skipping entry");
                }
            }
        }

        if skipped > 0 {
            warn!(
                provider = %self.name,
                template = pattern.template(),
                loaded,
                skipped,
                "Some entries did not match the key pattern"
            );
        }
        loaded
    }

    pub fn len(&self) -> usize {
        self.strings.read().len() + self.resources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LineProvider for MemoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_string(&self, key: &Line) -> LineString {
        let cache_key = self.comparer.key(key);
        match self.strings.read().get(&cache_key) {
            Some((_, value)) => LineResult::resolved(key.clone(), value.clone()).from_provider(self.name.as_str()),
            None => LineResult::not_found(key.clone()),
        }
    }

    fn resolve_resource(&self, key: &Line) -> LineResource {
        let cache_key = self.comparer.key(key);
        match self.resources.read().get(&cache_key) {
            Some((_, value)) => LineResult::resolved(key.clone(), value.clone()).from_provider(self.name.as_str()),
            None => LineResult::not_found(key.clone()),
        }
    }

    /// 저장된 모든 키 (표시 문자열 순)
    fn keys(&self) -> Enumeration<Line> {
        let mut keys: Vec<Line> = self
            .strings
            .read()
            .values()
            .map(|(line, _)| line.clone())
            .chain(self.resources.read().values().map(|(line, _)| line.clone()))
            .collect();
        keys.sort_by_cached_key(|line| line.to_string());
        Ok(Some(self.comparer.dedup(keys)))
    }

    /// 키들의 유효 `Culture` 값 (없으면 invariant culture `""`)
    fn cultures(&self) -> Enumeration<String> {
        let mut cultures = BTreeSet::new();
        for key in self.strings.read().keys().chain(self.resources.read().keys()) {
            cultures.insert(key.effective_value(names::CULTURE).unwrap_or_default().to_string());
        }
        Ok(Some(cultures.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexline_foundation::{EmptyValuePolicy, ResolveStatus};

    fn provider() -> MemoryProvider {
        MemoryProvider::new("memory", Arc::new(KeyComparer::default()))
    }

    #[test]
    fn test_insert_and_resolve() {
        let memory = provider();
        let key = Line::root().culture("en").section("MyController").key("hello");
        assert!(memory.insert_string(key.clone(), "Hello World!").is_none());

        // Culture 위치가 달라도 같은 키
        let lookup = Line::root().section("MyController").key("hello").culture("en");
        let result = memory.resolve_string(&lookup);
        assert_eq!(result.as_str(), Some("Hello World!"));
        assert_eq!(result.provider.as_deref(), Some("memory"));
        assert!(result.key.ptr_eq(&lookup));

        let replaced = memory.insert_string(key, "Hi");
        assert_eq!(replaced.as_deref(), Some("Hello World!"));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let memory = provider();
        let result = memory.resolve_string(&Line::root().key("none"));
        assert_eq!(result.status, ResolveStatus::NotFound);
        assert_eq!(
            memory.resolve_resource(&Line::root().key("none")).status,
            ResolveStatus::NotFound
        );
    }

    #[test]
    fn test_resources_and_remove() {
        let memory = provider();
        let key = Line::root().resource("logo").key("png");
        memory.insert_resource(key.clone(), vec![1u8, 2, 3]);
        assert_eq!(
            memory.resolve_resource(&key).value.as_deref(),
            Some(&[1u8, 2, 3][..])
        );
        assert!(memory.remove(&key));
        assert!(!memory.remove(&key));
        assert!(memory.is_empty());
    }

    #[test]
    fn test_keys_and_cultures() {
        let memory = provider();
        memory.insert_string(Line::root().culture("en").key("a"), "A");
        memory.insert_string(Line::root().culture("de").key("a"), "A");
        memory.insert_string(Line::root().key("b"), "B");

        let keys = memory.keys().unwrap().unwrap();
        assert_eq!(keys.len(), 3);
        let cultures = memory.cultures().unwrap().unwrap();
        assert_eq!(cultures, vec!["", "de", "en"]);
    }

    #[test]
    fn test_empty_culture_counts_as_invariant() {
        let distinct = provider();
        distinct.insert_string(Line::root().culture("").key("a"), "A");
        distinct.insert_string(Line::root().key("a"), "B");
        // 기본 정책에서 "" 와 부재는 다른 키
        assert_eq!(distinct.len(), 2);
        assert_eq!(distinct.cultures().unwrap().unwrap(), vec![""]);

        let comparer = KeyComparer::default().with_empty_policy(EmptyValuePolicy::TreatAsAbsent);
        let absent = MemoryProvider::new("memory", Arc::new(comparer));
        absent.insert_string(Line::root().culture("").key("a"), "A");
        absent.insert_string(Line::root().key("a"), "B");
        assert_eq!(absent.len(), 1);
        assert_eq!(absent.cultures().unwrap().unwrap(), vec![""]);
    }

    #[test]
    fn test_load_table_from_pattern() {
        let pattern = LinePattern::standard("{Section:}{Key}").unwrap();
        let memory = MemoryProvider::from_pattern_table(
            "table",
            Arc::new(KeyComparer::default()),
            &pattern,
            [("MyController:hello", "Hello"), ("broken", "x")],
        );
        assert_eq!(memory.len(), 1);

        let loaded = memory.load_table_onto(
            &Line::root().culture("de"),
            &pattern,
            vec![("MyController:hello".to_string(), "Hallo".to_string())],
        );
        assert_eq!(loaded, 1);
        let de = Line::root().culture("de").section("MyController").key("hello");
        assert_eq!(memory.resolve_string(&de).as_str(), Some("Hallo"));
    }
}
