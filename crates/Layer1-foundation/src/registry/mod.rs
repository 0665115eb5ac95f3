//! Parameter Registry - 파라미터 이름 분류
//!
//! 각 파라미터 이름은 한 번, 전역적으로 canonical / non-canonical로 분류된다.
//! canonical 이름은 추가로 고정된 상대 순서(order)를 갖는다.
//!
//! 레지스트리는 빌드 후 불변이며 `Arc`로 주입된다 (전역 싱글톤 없음).
//! 테스트는 서로 독립적인 인스턴스를 자유롭게 만들 수 있다.

use crate::line::validate_name;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// 표준 파라미터 이름
pub mod names {
    pub const CULTURE: &str = "Culture";
    pub const FORMAT: &str = "Format";
    pub const LOCATION: &str = "Location";
    pub const ASSEMBLY: &str = "Assembly";
    pub const RESOURCE: &str = "Resource";
    pub const TYPE: &str = "Type";
    pub const SECTION: &str = "Section";
    pub const KEY: &str = "Key";
    /// 관찰자 첨부 (키 파라미터 아님)
    pub const LOGGER: &str = "Logger";
    /// provider 첨부 (키 파라미터 아님)
    pub const ASSET: &str = "Asset";
}

/// 파라미터 분류 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub name: String,
    /// 순서 민감, 누적 파라미터인지
    pub canonical: bool,
    /// canonical 이름 간 상대 순서
    #[serde(default)]
    pub order: i32,
}

impl ParameterInfo {
    pub fn canonical(name: impl Into<String>, order: i32) -> Self {
        Self {
            name: name.into(),
            canonical: true,
            order,
        }
    }

    pub fn non_canonical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            canonical: false,
            order: 0,
        }
    }
}

/// 불변 파라미터 레지스트리
#[derive(Debug, Clone)]
pub struct ParameterRegistry {
    infos: HashMap<Arc<str>, ParameterInfo>,
    /// 소문자 이름 -> 정식 이름
    folded: HashMap<String, Arc<str>>,
}

impl ParameterRegistry {
    /// 빌더
    pub fn builder() -> ParameterRegistryBuilder {
        ParameterRegistryBuilder::default()
    }

    /// 표준 어휘
    ///
    /// - non-canonical: Culture, Format
    /// - canonical: Location < Assembly < Resource < Type < Section < Key
    pub fn standard() -> Self {
        Self::from_infos(standard_infos())
    }

    fn from_infos(list: Vec<ParameterInfo>) -> Self {
        let mut infos = HashMap::with_capacity(list.len());
        let mut folded = HashMap::with_capacity(list.len());
        for info in list {
            let name: Arc<str> = Arc::from(info.name.as_str());
            folded.insert(info.name.to_ascii_lowercase(), name.clone());
            infos.insert(name, info);
        }
        Self { infos, folded }
    }

    pub fn get(&self, name: &str) -> Option<&ParameterInfo> {
        self.infos.get(name)
    }

    /// 등록되지 않은 이름은 non-canonical
    pub fn is_canonical(&self, name: &str) -> bool {
        self.get(name).map(|info| info.canonical).unwrap_or(false)
    }

    pub fn order(&self, name: &str) -> Option<i32> {
        self.get(name).filter(|info| info.canonical).map(|info| info.order)
    }

    /// 대소문자 무시 이름 해석 (`culture` -> `Culture`)
    pub fn resolve_name(&self, name: &str) -> Option<Arc<str>> {
        self.folded.get(&name.to_ascii_lowercase()).cloned()
    }

    /// canonical 이름들 (order 순)
    pub fn canonical_names(&self) -> Vec<Arc<str>> {
        let mut list: Vec<_> = self
            .infos
            .iter()
            .filter(|(_, info)| info.canonical)
            .map(|(name, info)| (info.order, name.clone()))
            .collect();
        list.sort();
        list.into_iter().map(|(_, name)| name).collect()
    }

    /// non-canonical 이름들 (이름 순)
    pub fn non_canonical_names(&self) -> Vec<Arc<str>> {
        let mut list: Vec<_> = self
            .infos
            .iter()
            .filter(|(_, info)| !info.canonical)
            .map(|(name, _)| name.clone())
            .collect();
        list.sort();
        list
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn infos(&self) -> impl Iterator<Item = &ParameterInfo> {
        self.infos.values()
    }

    /// 레지스트리에서 기본 템플릿 생성
    ///
    /// non-canonical 이름, canonical 이름(order 순)이 `:`로 이어지며
    /// 가장 뒤의 canonical 이름만 필수 플레이스홀더가 된다.
    pub fn default_template(&self) -> String {
        let mut names = self.non_canonical_names();
        let canonical = self.canonical_names();
        let required = canonical.last().cloned();
        names.extend(canonical);

        let mut template = String::new();
        for name in &names {
            if Some(name) == required.as_ref() {
                continue;
            }
            template.push_str(&format!("[{{{}:}}]", name));
        }
        if let Some(name) = required {
            template.push_str(&format!("{{{}}}", name));
        }
        template
    }
}

impl Default for ParameterRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_infos() -> Vec<ParameterInfo> {
    vec![
        ParameterInfo::non_canonical(names::CULTURE),
        ParameterInfo::non_canonical(names::FORMAT),
        ParameterInfo::canonical(names::LOCATION, 10),
        ParameterInfo::canonical(names::ASSEMBLY, 20),
        ParameterInfo::canonical(names::RESOURCE, 30),
        ParameterInfo::canonical(names::TYPE, 40),
        ParameterInfo::canonical(names::SECTION, 50),
        ParameterInfo::canonical(names::KEY, 60),
    ]
}

// ============================================================================
// Builder
// ============================================================================

/// 레지스트리 빌더
#[derive(Debug, Default, Clone)]
pub struct ParameterRegistryBuilder {
    infos: Vec<ParameterInfo>,
}

impl ParameterRegistryBuilder {
    /// 표준 어휘에서 시작
    pub fn standard() -> Self {
        Self {
            infos: standard_infos(),
        }
    }

    pub fn canonical(mut self, name: impl Into<String>, order: i32) -> Self {
        self.infos.push(ParameterInfo::canonical(name, order));
        self
    }

    pub fn non_canonical(mut self, name: impl Into<String>) -> Self {
        self.infos.push(ParameterInfo::non_canonical(name));
        self
    }

    pub fn info(mut self, info: ParameterInfo) -> Self {
        self.infos.push(info);
        self
    }

    /// 같은 이름을 다시 등록하면 나중 것이 대체한다
    pub fn infos(mut self, infos: impl IntoIterator<Item = ParameterInfo>) -> Self {
        self.infos.extend(infos);
        self
    }

    /// 이름 검증 후 빌드
    ///
    /// 대소문자만 다른 두 이름은 모호하므로 거부한다.
    pub fn build(self) -> Result<ParameterRegistry> {
        let mut merged: Vec<ParameterInfo> = Vec::with_capacity(self.infos.len());
        for info in self.infos {
            validate_name(&info.name)?;
            if let Some(existing) = merged.iter_mut().find(|e| e.name == info.name) {
                *existing = info;
                continue;
            }
            if merged
                .iter()
                .any(|e| e.name.eq_ignore_ascii_case(&info.name))
            {
                return Err(Error::Config(format!(
                    "parameter '{}' differs from an existing name only by case",
                    info.name
                )));
            }
            merged.push(info);
        }
        Ok(ParameterRegistry::from_infos(merged))
    }
}
