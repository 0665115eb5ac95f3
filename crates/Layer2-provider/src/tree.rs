//! Provider Tree - 깊이 우선 composite provider
//!
//! 자식은 등록 순서대로 조회되며 값을 낸 첫 자식이 이긴다.
//! 자식이 composite이면 다음 형제로 넘어가기 전에 그 자식들을 먼저 조회한다.
//! 어떤 자식도 두 번 조회되지 않는다. 같은 provider(`Arc`)가 여러 번 등록되었거나
//! 중첩 composite 사이에 공유되어도 한 번의 순회에서는 처음 위치에서만 조회된다.
//!
//! ```text
//! root ─┬─ P1 (miss)
//!       ├─ group ─┬─ P2 (miss)
//!       │         └─ P3 (hit)   ← 여기서 종료
//!       └─ P4                  (조회 안 함)
//! ```
//!
//! 조회 중 ProviderFault가 나오면 `FaultPolicy`를 따른다 (루트의 정책이 전체에 적용).

use lexline_foundation::{
    Enumeration, FaultPolicy, KeyComparer, Line, LineProvider, LineResource, LineResult,
    LineString, ProviderFault,
};
use std::collections::HashSet;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{trace, warn};

/// Composite provider
pub struct CompositeProvider {
    name: String,
    children: Vec<Arc<dyn LineProvider>>,
    comparer: Arc<KeyComparer>,
    fault_policy: FaultPolicy,
}

impl CompositeProvider {
    pub fn new(name: impl Into<String>, comparer: Arc<KeyComparer>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            comparer,
            fault_policy: FaultPolicy::default(),
        }
    }

    /// 자식 추가 (등록 순서 = 조회 순서)
    pub fn with_child(mut self, child: Arc<dyn LineProvider>) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Arc<dyn LineProvider>>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    pub fn fault_policy(&self) -> FaultPolicy {
        self.fault_policy
    }

    pub fn comparer(&self) -> &Arc<KeyComparer> {
        &self.comparer
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// 리프들을 깊이 우선으로 방문. `Break`면 즉시 중단.
    fn visit_leaves<B>(
        &self,
        visit: &mut impl FnMut(&dyn LineProvider) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        let mut seen = HashSet::new();
        Self::visit_children(&self.children, &mut seen, visit)
    }

    /// `seen`: 이번 순회에서 이미 방문한 provider 주소
    fn visit_children<B>(
        children: &[Arc<dyn LineProvider>],
        seen: &mut HashSet<*const ()>,
        visit: &mut impl FnMut(&dyn LineProvider) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        for child in children {
            if !seen.insert(Arc::as_ptr(child) as *const ()) {
                trace!(provider = child.name(), "Skipping provider already visited");
                continue;
            }
            match child.children() {
                Some(grandchildren) => Self::visit_children(grandchildren, seen, &mut *visit)?,
                None => visit(child.as_ref())?,
            }
        }
        ControlFlow::Continue(())
    }

    fn resolve_with<T>(
        &self,
        key: &Line,
        query: impl Fn(&dyn LineProvider, &Line) -> LineResult<T>,
    ) -> LineResult<T> {
        let mut first_fault: Option<LineResult<T>> = None;
        let policy = self.fault_policy;

        let flow = self.visit_leaves(&mut |leaf: &dyn LineProvider| {
            trace!(composite = %self.name, provider = leaf.name(), key = %key, "Querying provider");
            let mut result = query(leaf, key);
            if result.provider.is_none() {
                result.provider = Some(Arc::from(leaf.name()));
            }

            if result.has_value() {
                return ControlFlow::Break(result);
            }
            if result.is_fault() {
                warn!(
                    composite = %self.name,
                    provider = leaf.name(),
                    key = %key,
                    fault = ?result.fault,
                    policy = ?policy,
                    "Provider fault during resolve"
                );
                match policy {
                    FaultPolicy::FailFast => return ControlFlow::Break(result),
                    FaultPolicy::ContinueSiblings => {
                        first_fault.get_or_insert(result);
                    }
                }
            }
            ControlFlow::Continue(())
        });

        match flow {
            ControlFlow::Break(result) => result,
            ControlFlow::Continue(()) => {
                first_fault.unwrap_or_else(|| LineResult::not_found(key.clone()))
            }
        }
    }

    /// 모든 리프의 열거 결과를 모은다 (지원하지 않는 리프는 건너뜀)
    fn collect<T>(
        &self,
        what: &'static str,
        query: impl Fn(&dyn LineProvider) -> Enumeration<T>,
    ) -> std::result::Result<Option<Vec<T>>, ProviderFault> {
        let mut collected: Option<Vec<T>> = None;
        let policy = self.fault_policy;

        let flow = self.visit_leaves(&mut |leaf: &dyn LineProvider| {
            match query(leaf) {
                Ok(Some(items)) => collected.get_or_insert_with(Vec::new).extend(items),
                Ok(None) => {}
                Err(fault) => {
                    warn!(
                        composite = %self.name,
                        provider = leaf.name(),
                        what,
                        %fault,
                        "Provider fault during enumeration"
                    );
                    if policy == FaultPolicy::FailFast {
                        return ControlFlow::Break(fault);
                    }
                }
            }
            ControlFlow::Continue(())
        });

        match flow {
            ControlFlow::Break(fault) => Err(fault),
            ControlFlow::Continue(()) => Ok(collected),
        }
    }
}

impl LineProvider for CompositeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_string(&self, key: &Line) -> LineString {
        self.resolve_with(key, |leaf, key| leaf.resolve_string(key))
    }

    fn resolve_resource(&self, key: &Line) -> LineResource {
        self.resolve_with(key, |leaf, key| leaf.resolve_resource(key))
    }

    /// 모든 리프 키의 합집합 (KeyComparer로 중복 제거, 첫 등장 순서)
    fn keys(&self) -> Enumeration<Line> {
        Ok(self
            .collect("keys", |leaf| leaf.keys())?
            .map(|keys| self.comparer.dedup(keys)))
    }

    fn cultures(&self) -> Enumeration<String> {
        Ok(self.collect("cultures", |leaf| leaf.cultures())?.map(|cultures| {
            let mut seen = HashSet::new();
            cultures
                .into_iter()
                .filter(|culture| seen.insert(culture.clone()))
                .collect()
        }))
    }

    /// 모든 리프를 한 번씩 reload하고 첫 번째 실패를 반환
    fn reload(&self) -> std::result::Result<(), ProviderFault> {
        let mut first_error = None;
        let _ = self.visit_leaves(&mut |leaf: &dyn LineProvider| -> ControlFlow<()> {
            if let Err(fault) = leaf.reload() {
                warn!(composite = %self.name, provider = leaf.name(), %fault, "Reload failed");
                first_error.get_or_insert(fault);
            }
            ControlFlow::Continue(())
        });
        first_error.map_or(Ok(()), Err)
    }

    fn children(&self) -> Option<&[Arc<dyn LineProvider>]> {
        Some(self.children.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexline_foundation::ResolveStatus;

    struct Fixed {
        name: &'static str,
        value: Option<&'static str>,
    }

    impl LineProvider for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn resolve_string(&self, key: &Line) -> LineString {
            match self.value {
                Some(value) => LineResult::resolved(key.clone(), Arc::from(value)),
                None => LineResult::not_found(key.clone()),
            }
        }

        fn cultures(&self) -> Enumeration<String> {
            Ok(self.value.map(|v| vec![v.to_string()]))
        }
    }

    struct Faulty;

    impl LineProvider for Faulty {
        fn name(&self) -> &str {
            "faulty"
        }

        fn resolve_string(&self, key: &Line) -> LineString {
            LineResult::fault(key.clone(), ProviderFault::new("faulty", "broken"))
        }

        fn keys(&self) -> Enumeration<Line> {
            Err(ProviderFault::new("faulty", "broken"))
        }
    }

    fn fixed(name: &'static str, value: Option<&'static str>) -> Arc<dyn LineProvider> {
        Arc::new(Fixed { name, value })
    }

    fn composite() -> CompositeProvider {
        CompositeProvider::new("root", Arc::new(KeyComparer::default()))
    }

    #[test]
    fn test_first_value_wins() {
        let tree = composite()
            .with_child(fixed("a", None))
            .with_child(fixed("b", Some("B")))
            .with_child(fixed("c", Some("C")));
        let result = tree.resolve_string(&Line::root().key("x"));
        assert_eq!(result.as_str(), Some("B"));
        assert_eq!(result.provider.as_deref(), Some("b"));
    }

    #[test]
    fn test_nested_before_sibling() {
        let nested = composite()
            .with_child(fixed("n1", None))
            .with_child(fixed("n2", Some("nested")));
        let tree = composite()
            .with_child(Arc::new(nested))
            .with_child(fixed("after", Some("sibling")));
        assert_eq!(tree.resolve_string(&Line::root()).as_str(), Some("nested"));
    }

    #[test]
    fn test_empty_is_not_found() {
        let result = composite().resolve_string(&Line::root().key("x"));
        assert_eq!(result.status, ResolveStatus::NotFound);
        assert!(composite().keys().unwrap().is_none());
    }

    #[test]
    fn test_fail_fast() {
        let tree = composite()
            .with_child(Arc::new(Faulty))
            .with_child(fixed("b", Some("B")));
        let result = tree.resolve_string(&Line::root());
        assert!(result.is_fault());
        assert!(tree.keys().is_err());
    }

    #[test]
    fn test_continue_siblings() {
        let tree = composite()
            .with_fault_policy(FaultPolicy::ContinueSiblings)
            .with_child(Arc::new(Faulty))
            .with_child(fixed("b", Some("B")));
        assert_eq!(tree.resolve_string(&Line::root()).as_str(), Some("B"));

        let only_fault = composite()
            .with_fault_policy(FaultPolicy::ContinueSiblings)
            .with_child(Arc::new(Faulty))
            .with_child(fixed("b", None));
        assert!(only_fault.resolve_string(&Line::root()).is_fault());
    }

    #[test]
    fn test_cultures_union() {
        let tree = composite()
            .with_child(fixed("a", Some("en")))
            .with_child(fixed("b", Some("de")))
            .with_child(fixed("c", Some("en")))
            .with_child(fixed("d", None));
        assert_eq!(
            tree.cultures().unwrap(),
            Some(vec!["en".to_string(), "de".to_string()])
        );
    }
}
