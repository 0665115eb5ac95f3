//! Print / parse round-trip properties
//!
//! For chains whose parameters are all covered by the template,
//! `parse(print(line))` is equal to `line` under the key comparer.

use lexline_foundation::{EmptyValuePolicy, KeyComparer, Line, ParameterRegistry, RuleSetting};
use lexline_pattern::{LinePattern, PatternRules};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

/// 구분자 `:`를 포함하지 않는 비어 있지 않은 값
fn value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_ .-]{1,12}"
}

/// 빈 문자열을 포함한 값
fn maybe_empty_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_ .-]{0,8}"
}

/// 구분자 `.`를 포함하지 않는 값
fn segment_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,8}"
}

proptest! {
    #[test]
    fn culture_section_key_round_trip(
        culture in value_strategy(),
        section in value_strategy(),
        key in value_strategy(),
    ) {
        let pattern = LinePattern::standard("{culture:}{section:}{key}").unwrap();
        let comparer = KeyComparer::default();
        let line = Line::root()
            .culture(culture.as_str())
            .section(section.as_str())
            .key(key.as_str());

        let printed = pattern.print(&line).unwrap();
        let parsed = pattern.parse(&printed).unwrap();
        prop_assert!(comparer.equals(&parsed, &line), "{} -> {:?}", printed, parsed);
    }

    #[test]
    fn culture_position_does_not_matter_for_round_trip(
        culture in value_strategy(),
        section in value_strategy(),
        key in value_strategy(),
    ) {
        let pattern = LinePattern::standard("{culture:}{section:}{key}").unwrap();
        let comparer = KeyComparer::default();
        // Culture가 tail에 있어도 non-canonical이므로 동등
        let line = Line::root()
            .section(section.as_str())
            .key(key.as_str())
            .culture(culture.as_str());

        let parsed = pattern.parse(&pattern.print(&line).unwrap()).unwrap();
        prop_assert!(comparer.equals(&parsed, &line));
    }

    #[test]
    fn optional_groups_round_trip(
        culture in proptest::option::of(value_strategy()),
        location in proptest::option::of("[a-z]{1,6}"),
        key in value_strategy(),
    ) {
        let registry = ParameterRegistry::standard();
        let rules = PatternRules::new().with_rule("Location", RuleSetting::postfix("/"));
        let pattern =
            LinePattern::compile_with_rules("[{Location}][{Culture:}]{Key}", &registry, &rules)
                .unwrap();
        let comparer = KeyComparer::default();

        let mut line = Line::root();
        if let Some(location) = &location {
            line = line.location(location.as_str());
        }
        if let Some(culture) = &culture {
            line = line.culture(culture.as_str());
        }
        let line = line.key(key.as_str());

        let parsed = pattern.parse(&pattern.print(&line).unwrap()).unwrap();
        prop_assert!(comparer.equals(&parsed, &line));
    }
}

proptest! {
    #[test]
    fn empty_values_round_trip_by_default(
        culture in maybe_empty_strategy(),
        section in maybe_empty_strategy(),
        key in maybe_empty_strategy(),
    ) {
        let pattern = LinePattern::standard("{culture:}{section:}{key}").unwrap();
        let comparer = KeyComparer::default();
        let line = Line::root()
            .culture(culture.as_str())
            .section(section.as_str())
            .key(key.as_str());

        let printed = pattern.print(&line).unwrap();
        let parsed = pattern.parse(&printed).unwrap();
        prop_assert!(comparer.equals(&parsed, &line), "{} -> {:?}", printed, parsed);
    }

    #[test]
    fn empty_culture_round_trips_as_absent(
        culture in maybe_empty_strategy(),
        section in value_strategy(),
        key in value_strategy(),
    ) {
        let comparer = KeyComparer::default().with_empty_policy(EmptyValuePolicy::TreatAsAbsent);
        let pattern = LinePattern::for_comparer(
            "[{culture:}]{section:}{key}",
            &comparer,
            &PatternRules::default(),
        )
        .unwrap();
        let line = Line::root()
            .culture(culture.as_str())
            .section(section.as_str())
            .key(key.as_str());

        let printed = pattern.print(&line).unwrap();
        prop_assert_eq!(printed.starts_with(&format!("{}:", culture)), !culture.is_empty());
        let parsed = pattern.parse(&printed).unwrap();
        prop_assert!(comparer.equals(&parsed, &line), "{} -> {:?}", printed, parsed);
    }

    #[test]
    fn indexed_sections_round_trip_out_of_template_order(
        sections in proptest::collection::vec(segment_strategy(), 3),
        key in segment_strategy(),
    ) {
        let pattern = LinePattern::standard("{Section_2}.{Section_0}.{Key}.{Section_1}").unwrap();
        let comparer = KeyComparer::default();
        let line = sections
            .iter()
            .fold(Line::root(), |line, section| line.section(section.as_str()))
            .key(key.as_str());

        let printed = pattern.print(&line).unwrap();
        let parsed = pattern.parse(&printed).unwrap();
        prop_assert_eq!(parsed.occurrences("Section"), line.occurrences("Section"));
        prop_assert!(comparer.equals(&parsed, &line), "{} -> {:?}", printed, parsed);
    }
}

#[test]
fn test_batch_parse_resource_names() -> anyhow::Result<()> {
    let pattern = LinePattern::standard("{Location/}{Key}[{.Culture}]{.Format}")?;
    let lines = pattern.parse_all([
        "strings/hello.en.json",
        "strings/hello.json",
        "not-a-resource",
    ]);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].effective_value("Culture"), Some("en"));
    assert_eq!(lines[1].effective_value("Culture"), None);
    assert_eq!(lines[1].effective_value("Format"), Some("json"));
    Ok(())
}
