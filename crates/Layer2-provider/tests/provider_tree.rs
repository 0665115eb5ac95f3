//! CompositeProvider 조회 순서 테스트
//!
//! 실행: cargo test -p lexline-provider --test provider_tree -- --nocapture

mod common;

use common::{comparer, init_tracing, CallLog, FaultyProvider, TracingProvider};
use lexline_foundation::{FaultPolicy, LexlineConfig, Line, LineProvider, ResolveStatus};
use lexline_pattern::LinePattern;
use lexline_provider::{CompositeProvider, MemoryProvider};
use std::sync::Arc;

fn key() -> Line {
    Line::root().culture("en").key("title")
}

#[test]
fn test_dfs_order_is_registration_order() {
    init_tracing();
    let log = CallLog::default();
    let p1 = TracingProvider::new("P1", log.clone());
    let p2 = TracingProvider::new("P2", log.clone()).with_string(key(), "X");

    let forward = CompositeProvider::new("forward", comparer())
        .with_child(p1.clone())
        .with_child(p2.clone());
    assert_eq!(forward.resolve_string(&key()).as_str(), Some("X"));
    assert_eq!(log.calls(), vec!["P1", "P2"]);

    log.clear();
    let reversed = CompositeProvider::new("reversed", comparer())
        .with_child(p2.clone())
        .with_child(p1.clone());
    assert_eq!(reversed.resolve_string(&key()).as_str(), Some("X"));
    assert_eq!(log.calls(), vec!["P2"], "P1 must not be queried after a match");
}

#[test]
fn test_nested_children_visited_before_siblings() {
    let log = CallLog::default();
    let group = CompositeProvider::new("group", comparer())
        .with_child(TracingProvider::new("G1", log.clone()))
        .with_child(TracingProvider::new("G2", log.clone()));
    let tree = CompositeProvider::new("root", comparer())
        .with_child(TracingProvider::new("A", log.clone()))
        .with_child(Arc::new(group))
        .with_child(TracingProvider::new("B", log.clone()).with_string(key(), "from B"));

    let result = tree.resolve_string(&key());
    assert_eq!(result.as_str(), Some("from B"));
    assert_eq!(result.provider.as_deref(), Some("B"));
    assert_eq!(log.calls(), vec!["A", "G1", "G2", "B"]);
}

#[test]
fn test_miss_everywhere_queries_each_leaf_once() {
    let log = CallLog::default();
    let shared = TracingProvider::new("S", log.clone());
    let group = CompositeProvider::new("group", comparer())
        .with_child(shared.clone())
        .with_child(TracingProvider::new("U", log.clone()));
    let tree = CompositeProvider::new("root", comparer())
        .with_child(shared.clone())
        .with_child(TracingProvider::new("T", log.clone()))
        .with_child(shared.clone())
        .with_child(Arc::new(group));

    let result = tree.resolve_string(&key());
    assert_eq!(result.status, ResolveStatus::NotFound);
    assert_eq!(log.calls(), vec!["S", "T", "U"]);
    assert_eq!(shared.calls(), 1);

    // 다음 조회는 새 순회이므로 다시 한 번 조회된다
    tree.resolve_string(&key());
    assert_eq!(shared.calls(), 2);
}

#[test]
fn test_shared_group_visited_once() {
    let log = CallLog::default();
    let group: Arc<CompositeProvider> = Arc::new(
        CompositeProvider::new("group", comparer())
            .with_child(TracingProvider::new("G", log.clone())),
    );
    let tree = CompositeProvider::new("root", comparer())
        .with_child(group.clone())
        .with_child(TracingProvider::new("H", log.clone()).with_string(key(), "found"))
        .with_child(group.clone());

    assert_eq!(tree.resolve_string(&key()).as_str(), Some("found"));
    assert_eq!(log.calls(), vec!["G", "H"]);

    log.clear();
    let missing = Line::root().key("missing");
    tree.resolve_string(&missing);
    assert_eq!(log.calls(), vec!["G", "H"]);
}

#[test]
fn test_fault_policy_from_config() -> anyhow::Result<()> {
    let config: LexlineConfig = serde_json::from_str(r#"{ "faultPolicy": "continueSiblings" }"#)?;
    assert_eq!(config.fault_policy(), FaultPolicy::ContinueSiblings);

    let log = CallLog::default();
    let tree = CompositeProvider::new("root", Arc::new(config.comparer()?))
        .with_fault_policy(config.fault_policy())
        .with_child(FaultyProvider::new(log.clone()))
        .with_child(TracingProvider::new("after", log.clone()).with_string(key(), "recovered"));

    assert_eq!(tree.resolve_string(&key()).as_str(), Some("recovered"));
    assert_eq!(log.calls(), vec!["faulty", "after"]);

    log.clear();
    let strict = CompositeProvider::new("strict", comparer())
        .with_child(FaultyProvider::new(log.clone()))
        .with_child(TracingProvider::new("after", log.clone()).with_string(key(), "recovered"));
    let result = strict.resolve_string(&key());
    assert!(result.is_fault());
    assert_eq!(result.provider.as_deref(), Some("faulty"));
    assert_eq!(log.calls(), vec!["faulty"]);
    Ok(())
}

#[test]
fn test_keys_union_across_pattern_tables() -> anyhow::Result<()> {
    let pattern = LinePattern::standard("{Culture:}{Section:}{Key}")?;
    let first = MemoryProvider::from_pattern_table(
        "first",
        comparer(),
        &pattern,
        [("en:Home:title", "Home"), ("de:Home:title", "Startseite")],
    );
    let second = MemoryProvider::from_pattern_table(
        "second",
        comparer(),
        &pattern,
        [("en:Home:title", "Shadowed"), ("fi:Home:title", "Koti")],
    );
    let tree = CompositeProvider::new("root", comparer())
        .with_child(Arc::new(first))
        .with_child(Arc::new(second));

    let keys = tree.keys()?.expect("memory providers enumerate keys");
    assert_eq!(keys.len(), 3);
    let printed: Vec<String> = keys
        .iter()
        .map(|key| pattern.print(key))
        .collect::<Result<_, _>>()?;
    assert!(printed.contains(&"fi:Home:title".to_string()));

    let cultures = tree.cultures()?.expect("memory providers enumerate cultures");
    assert_eq!(cultures, vec!["de", "en", "fi"]);

    let en = pattern.parse("en:Home:title")?;
    assert_eq!(tree.resolve_string(&en).as_str(), Some("Home"));
    Ok(())
}
