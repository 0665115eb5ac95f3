//! Key Comparer - 라인의 구조적 동등성과 해시
//!
//! tail → root 방향으로 한 번 순회하며 파라미터를 두 갈래로 나눈다:
//! - canonical: 모든 occurrence를 위치 순서대로 유지 (누적)
//! - non-canonical: 이름별로 처음 만난 값 (= tail에 가장 가까운 유효 값)
//!
//! 두 라인은 canonical 목록이 원소별로 같고 non-canonical (이름, 값) 집합이 같을 때 동등하다.
//! 해시는 canonical 원소를 위치 순서로, non-canonical 쌍을 순서 무관하게 조합하므로
//! 동등한 라인은 항상 같은 해시를 갖는다.
//!
//! 첨부물(`Logger`, `Asset`)은 키의 일부가 아니므로 무시된다.

use crate::cache::{combine_ordered, combine_unordered, compute_hash};
use crate::line::Line;
use crate::registry::ParameterRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// non-canonical 파라미터의 빈 문자열 값 처리
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyValuePolicy {
    /// `""`는 독립된 값이다 (부재와 다르다)
    #[default]
    Distinct,
    /// tail에 가장 가까운 값이 `""`이면 그 파라미터는 부재로 취급
    TreatAsAbsent,
}

/// 비교에 쓰이는 라인의 분해 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyParts {
    /// root → tail 순서의 canonical (이름, 값)
    pub canonical: Vec<(Arc<str>, Arc<str>)>,
    /// non-canonical 이름 → 유효 값
    pub non_canonical: BTreeMap<Arc<str>, Arc<str>>,
}

impl KeyParts {
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty() && self.non_canonical.is_empty()
    }

    fn structural_hash(&self) -> u64 {
        let mut canonical = self.canonical.len() as u64;
        for (name, value) in &self.canonical {
            canonical = combine_ordered(canonical, compute_hash(&(&**name, &**value)));
        }

        let mut non_canonical = 0u64;
        for (name, value) in &self.non_canonical {
            non_canonical = combine_unordered(non_canonical, compute_hash(&(&**name, &**value)));
        }

        combine_ordered(canonical, non_canonical)
    }
}

// ============================================================================
// KeyComparer
// ============================================================================

/// 구조적 키 비교기
///
/// 레지스트리와 정책은 생성 시점에 고정된다.
#[derive(Debug, Clone)]
pub struct KeyComparer {
    registry: Arc<ParameterRegistry>,
    empty_policy: EmptyValuePolicy,
}

impl KeyComparer {
    pub fn new(registry: Arc<ParameterRegistry>) -> Self {
        Self {
            registry,
            empty_policy: EmptyValuePolicy::default(),
        }
    }

    pub fn with_empty_policy(mut self, policy: EmptyValuePolicy) -> Self {
        self.empty_policy = policy;
        self
    }

    pub fn registry(&self) -> &Arc<ParameterRegistry> {
        &self.registry
    }

    pub fn empty_policy(&self) -> EmptyValuePolicy {
        self.empty_policy
    }

    /// 라인을 canonical 목록과 non-canonical 맵으로 분해
    pub fn parts(&self, line: &Line) -> KeyParts {
        let mut parts = KeyParts::default();

        for parameter in line.parameters() {
            let Some(value) = parameter.text_arc() else {
                continue;
            };
            let name = parameter.name_arc();
            if self.registry.is_canonical(name) {
                parts.canonical.push((name.clone(), value.clone()));
            } else if !parts.non_canonical.contains_key(name) {
                parts.non_canonical.insert(name.clone(), value.clone());
            }
        }
        parts.canonical.reverse();

        // 가장 가까운 ""가 이전 값을 가린 뒤에 제거해야 한다
        if self.empty_policy == EmptyValuePolicy::TreatAsAbsent {
            parts.non_canonical.retain(|_, value| !value.is_empty());
        }

        parts
    }

    pub fn equals(&self, a: &Line, b: &Line) -> bool {
        a.ptr_eq(b) || self.parts(a) == self.parts(b)
    }

    pub fn hash(&self, line: &Line) -> u64 {
        self.parts(line).structural_hash()
    }

    /// 해시 테이블 키 (해시를 미리 계산해 둔다)
    pub fn key(&self, line: &Line) -> LineKey {
        LineKey::from_parts(self.parts(line))
    }

    /// 첫 등장 순서를 유지하며 구조적으로 중복인 라인 제거
    pub fn dedup(&self, lines: impl IntoIterator<Item = Line>) -> Vec<Line> {
        let mut seen = HashSet::new();
        lines
            .into_iter()
            .filter(|line| seen.insert(self.key(line)))
            .collect()
    }
}

impl Default for KeyComparer {
    fn default() -> Self {
        Self::new(Arc::new(ParameterRegistry::standard()))
    }
}

// ============================================================================
// LineKey
// ============================================================================

/// 구조적 동등성 클래스를 나타내는 해시 키
///
/// `Hash`는 미리 계산한 값을, `Eq`는 분해 결과 전체를 비교한다.
#[derive(Debug, Clone)]
pub struct LineKey {
    parts: Arc<KeyParts>,
    hash: u64,
}

impl LineKey {
    fn from_parts(parts: KeyParts) -> Self {
        let hash = parts.structural_hash();
        Self {
            parts: Arc::new(parts),
            hash,
        }
    }

    pub fn parts(&self) -> &KeyParts {
        &self.parts
    }

    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    /// non-canonical 유효 값
    pub fn effective_value(&self, name: &str) -> Option<&str> {
        self.parts.non_canonical.get(name).map(|value| &**value)
    }
}

impl PartialEq for LineKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && (Arc::ptr_eq(&self.parts, &other.parts) || self.parts == other.parts)
    }
}

impl Eq for LineKey {}

impl Hash for LineKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// `{Culture=en}/Section=a/Key=b` 형식
impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.parts.non_canonical.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str("}")?;
        for (name, value) in &self.parts.canonical {
            write!(f, "/{}={}", name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ParameterRegistryBuilder;

    fn standard() -> KeyComparer {
        KeyComparer::default()
    }

    #[test]
    fn test_canonical_order_matters() {
        let comparer = standard();
        let a = Line::root().type_name("X").key("Y");
        let b = Line::root().key("Y").type_name("X");
        assert!(!comparer.equals(&a, &b));
    }

    #[test]
    fn test_non_canonical_order_irrelevant() {
        let registry = ParameterRegistryBuilder::standard()
            .non_canonical("Type")
            .non_canonical("Key")
            .build()
            .unwrap();
        let comparer = KeyComparer::new(Arc::new(registry));

        let a = Line::root().type_name("X").key("Y");
        let b = Line::root().key("Y").type_name("X");
        assert!(comparer.equals(&a, &b));
        assert_eq!(comparer.hash(&a), comparer.hash(&b));
    }

    #[test]
    fn test_non_canonical_override() {
        let comparer = standard();
        let overridden = Line::root().culture("en").culture("fi");
        assert!(comparer.equals(&overridden, &Line::root().culture("fi")));
        assert!(!comparer.equals(&overridden, &Line::root().culture("en")));
        assert_eq!(
            comparer.hash(&overridden),
            comparer.hash(&Line::root().culture("fi"))
        );
    }

    #[test]
    fn test_canonical_accumulates() {
        let comparer = standard();
        let two = Line::root().section("a").section("b").key("k");
        let one = Line::root().section("b").key("k");
        assert!(!comparer.equals(&two, &one));

        let parts = comparer.parts(&two);
        let sections: Vec<&str> = parts
            .canonical
            .iter()
            .filter(|(name, _)| &**name == "Section")
            .map(|(_, value)| &**value)
            .collect();
        assert_eq!(sections, vec!["a", "b"]);
    }

    #[test]
    fn test_culture_position_irrelevant() {
        let comparer = standard();
        let a = Line::root().culture("en").section("MyController").key("hello");
        let b = Line::root().section("MyController").key("hello").culture("en");
        assert!(comparer.equals(&a, &b));
        assert_eq!(comparer.key(&a), comparer.key(&b));
    }

    #[test]
    fn test_empty_value_distinct_by_default() {
        let comparer = standard();
        let empty = Line::root().culture("").key("x");
        let absent = Line::root().key("x");
        assert_eq!(comparer.empty_policy(), EmptyValuePolicy::Distinct);
        assert!(!comparer.equals(&empty, &absent));

        // 가장 가까운 ""가 이전 값을 가린다
        let reset = Line::root().culture("en").key("x").culture("");
        assert!(comparer.equals(&reset, &empty));
    }

    #[test]
    fn test_empty_value_treated_as_absent() {
        let comparer = standard().with_empty_policy(EmptyValuePolicy::TreatAsAbsent);
        let empty = Line::root().culture("").key("x");
        let absent = Line::root().key("x");
        assert!(comparer.equals(&empty, &absent));
        assert_eq!(comparer.hash(&empty), comparer.hash(&absent));

        let reset = Line::root().culture("en").key("x").culture("");
        assert!(comparer.equals(&reset, &absent));
        assert!(!comparer.equals(&reset, &Line::root().culture("en").key("x")));

        // canonical ""는 여전히 값이다
        assert!(!comparer.equals(&Line::root().key(""), &Line::root()));
    }

    #[test]
    fn test_attachments_ignored() {
        struct Silent;
        impl crate::core::LineObserver for Silent {}

        let comparer = standard();
        let plain = Line::root().culture("en").key("x");
        let observed = Line::root().with_observer(Arc::new(Silent)).culture("en").key("x");
        assert!(comparer.equals(&plain, &observed));
    }

    #[test]
    fn test_unregistered_name_is_non_canonical() {
        let comparer = standard();
        let a = Line::root().append("Plural", "one").unwrap().key("x");
        let b = Line::root().key("x").append("Plural", "one").unwrap();
        assert!(comparer.equals(&a, &b));
    }

    #[test]
    fn test_dedup_keeps_first_seen() {
        let comparer = standard();
        let lines = vec![
            Line::root().culture("en").key("a"),
            Line::root().key("a").culture("en"),
            Line::root().culture("de").key("a"),
        ];
        let unique = comparer.dedup(lines.clone());
        assert_eq!(unique.len(), 2);
        assert!(unique[0].ptr_eq(&lines[0]));
        assert!(unique[1].ptr_eq(&lines[2]));
    }

    #[test]
    fn test_line_key_display() {
        let comparer = standard();
        let key = comparer.key(&Line::root().culture("en").section("s").key("k"));
        assert_eq!(key.to_string(), "{Culture=en}/Section=s/Key=k");
        assert_eq!(key.effective_value("Culture"), Some("en"));
    }
}
