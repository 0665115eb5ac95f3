//! Lexline Config - 통합 설정
//!
//! 글로벌(`<config_dir>/lexline/lexline.json`)과 프로젝트(`.lexline/lexline.json`)
//! 설정을 병합한다. 프로젝트 값이 우선한다.

use crate::comparer::{EmptyValuePolicy, KeyComparer};
use crate::core::FaultPolicy;
use crate::registry::{ParameterInfo, ParameterRegistry, ParameterRegistryBuilder};
use crate::storage::JsonStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// 설정 파일명
pub const LEXLINE_CONFIG_FILE: &str = "lexline.json";

// ============================================================================
// Lexline Config (통합)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexlineConfig {
    /// 버전 (마이그레이션용)
    #[serde(default = "default_version")]
    pub version: u32,

    /// 표준 어휘에서 시작할지 (기본 true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_parameters: Option<bool>,

    /// 추가/재정의 파라미터 분류
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_value_policy: Option<EmptyValuePolicy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault_policy: Option<FaultPolicy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheSettings>,

    /// 파라미터 이름 → 패턴 규칙
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, RuleSetting>,
}

fn default_version() -> u32 {
    1
}

impl LexlineConfig {
    pub fn new() -> Self {
        Self {
            version: default_version(),
            ..Default::default()
        }
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let global = JsonStore::global().ok();
        let project = JsonStore::current_project().ok();
        Self::load_from(global.as_ref(), project.as_ref())
    }

    /// 지정한 저장소들에서 병합 로드 (순서대로, 나중 것이 우선)
    pub fn load_from(global: Option<&JsonStore>, project: Option<&JsonStore>) -> Result<Self> {
        let mut config = Self::new();

        for store in [global, project].into_iter().flatten() {
            if let Some(layer) = store.load_optional::<LexlineConfig>(LEXLINE_CONFIG_FILE)? {
                debug!(dir = %store.base_dir().display(), "Merging lexline config");
                config.merge(layer);
            }
        }

        Ok(config)
    }

    /// 글로벌 설정만 로드
    pub fn load_global() -> Result<Self> {
        let store = JsonStore::global()?;
        Ok(store.load_or_default(LEXLINE_CONFIG_FILE))
    }

    /// 프로젝트 설정만 로드
    pub fn load_project() -> Result<Self> {
        let store = JsonStore::current_project()?;
        Ok(store.load_or_default(LEXLINE_CONFIG_FILE))
    }

    pub fn save_global(&self) -> Result<()> {
        JsonStore::global()?.save(LEXLINE_CONFIG_FILE, self)
    }

    pub fn save_project(&self) -> Result<()> {
        JsonStore::current_project()?.save(LEXLINE_CONFIG_FILE, self)
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: LexlineConfig) {
        self.version = self.version.max(other.version);
        if other.standard_parameters.is_some() {
            self.standard_parameters = other.standard_parameters;
        }
        // 같은 이름은 레지스트리 빌더에서 나중 것이 대체한다
        self.parameters.extend(other.parameters);
        if other.empty_value_policy.is_some() {
            self.empty_value_policy = other.empty_value_policy;
        }
        if other.fault_policy.is_some() {
            self.fault_policy = other.fault_policy;
        }
        if other.cache.is_some() {
            self.cache = other.cache;
        }
        for (name, rule) in other.rules {
            self.rules.entry(name).or_default().merge(rule);
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn empty_value_policy(&self) -> EmptyValuePolicy {
        self.empty_value_policy.unwrap_or_default()
    }

    pub fn fault_policy(&self) -> FaultPolicy {
        self.fault_policy.unwrap_or_default()
    }

    pub fn cache_settings(&self) -> CacheSettings {
        self.cache.clone().unwrap_or_default()
    }

    /// 설정된 파라미터 분류로 레지스트리 생성
    pub fn registry(&self) -> Result<ParameterRegistry> {
        let builder = if self.standard_parameters.unwrap_or(true) {
            ParameterRegistryBuilder::standard()
        } else {
            ParameterRegistry::builder()
        };
        builder.infos(self.parameters.iter().cloned()).build()
    }

    /// 레지스트리 + 빈 값 정책으로 비교기 생성
    pub fn comparer(&self) -> Result<KeyComparer> {
        Ok(KeyComparer::new(Arc::new(self.registry()?))
            .with_empty_policy(self.empty_value_policy()))
    }
}

// ============================================================================
// Cache Settings
// ============================================================================

/// 캐시 카테고리별 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSettings {
    #[serde(default = "default_true")]
    pub strings: bool,
    #[serde(default = "default_true")]
    pub resources: bool,
    #[serde(default = "default_true")]
    pub keys: bool,
    #[serde(default = "default_true")]
    pub cultures: bool,
    /// point lookup 테이블당 최대 엔트리 수 (0 = 무제한)
    #[serde(default)]
    pub max_entries: usize,
    /// ProviderFault 결과도 캐시할지
    #[serde(default)]
    pub cache_faults: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            strings: true,
            resources: true,
            keys: true,
            cultures: true,
            max_entries: 0,
            cache_faults: false,
        }
    }
}

impl CacheSettings {
    /// 모든 카테고리 비활성화
    pub fn disabled() -> Self {
        Self {
            strings: false,
            resources: false,
            keys: false,
            cultures: false,
            ..Default::default()
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_cache_faults(mut self, cache_faults: bool) -> Self {
        self.cache_faults = cache_faults;
        self
    }
}

// ============================================================================
// Rule Setting
// ============================================================================

/// 파라미터별 패턴 규칙 (prefix / postfix / capture 정규식)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<String>,
}

impl RuleSetting {
    pub fn postfix(postfix: impl Into<String>) -> Self {
        Self {
            postfix: Some(postfix.into()),
            ..Default::default()
        }
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Default::default()
        }
    }

    pub fn capture(capture: impl Into<String>) -> Self {
        Self {
            capture: Some(capture.into()),
            ..Default::default()
        }
    }

    /// other의 값이 있으면 덮어쓴다
    pub fn merge(&mut self, other: RuleSetting) {
        if other.prefix.is_some() {
            self.prefix = other.prefix;
        }
        if other.postfix.is_some() {
            self.postfix = other.postfix;
        }
        if other.capture.is_some() {
            self.capture = other.capture;
        }
    }
}
