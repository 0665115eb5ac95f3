//! Pattern Rules - 파라미터별 prefix / postfix / capture 규칙
//!
//! 템플릿에 인라인으로 적힌 값이 규칙보다 우선한다.

use lexline_foundation::{ParameterRegistry, RuleSetting};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct PatternRules {
    rules: HashMap<Arc<str>, RuleSetting>,
}

impl PatternRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// 설정 파일의 `rules` 섹션에서 생성 (이름은 레지스트리로 정규화)
    pub fn from_settings(
        settings: &BTreeMap<String, RuleSetting>,
        registry: &ParameterRegistry,
    ) -> Self {
        let mut rules = Self::new();
        for (name, rule) in settings {
            let name = registry
                .resolve_name(name)
                .unwrap_or_else(|| Arc::from(name.as_str()));
            rules.insert(name, rule.clone());
        }
        rules
    }

    pub fn with_rule(mut self, name: impl Into<Arc<str>>, rule: RuleSetting) -> Self {
        self.insert(name.into(), rule);
        self
    }

    /// 같은 이름에 규칙이 있으면 값이 있는 필드만 덮어쓴다
    pub fn insert(&mut self, name: Arc<str>, rule: RuleSetting) {
        self.rules.entry(name).or_default().merge(rule);
    }

    pub fn get(&self, name: &str) -> Option<&RuleSetting> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
