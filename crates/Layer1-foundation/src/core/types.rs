//! Core Types - 조회 결과 및 상태 코드

use crate::line::Line;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Severity - 닫힌 심각도 분류
// ============================================================================

/// 모든 조회 결과가 갖는 심각도
///
/// 소비자는 예외 타입이 아니라 이 값으로 분기한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// 값이 정상적으로 생성됨
    Ok,
    /// 값이 생성되었으나 주의사항이 있음
    Warning,
    /// 대체(fallback) 값이 생성됨
    Error,
    /// 값 없음
    Failed,
}

// ============================================================================
// ResolveStatus - 상세 상태
// ============================================================================

/// 조회 결과 상세 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolveStatus {
    Resolved,
    ResolvedWithWarning,
    /// 대체 값
    Fallback,
    /// 어떤 provider도 값을 내지 않음
    NotFound,
    /// 라인에 연결된 provider가 없음
    NoProvider,
    /// provider가 예기치 않은 오류를 냄
    ProviderFault,
}

impl ResolveStatus {
    pub fn severity(&self) -> Severity {
        match self {
            ResolveStatus::Resolved => Severity::Ok,
            ResolveStatus::ResolvedWithWarning => Severity::Warning,
            ResolveStatus::Fallback => Severity::Error,
            ResolveStatus::NotFound | ResolveStatus::NoProvider | ResolveStatus::ProviderFault => {
                Severity::Failed
            }
        }
    }
}

// ============================================================================
// ProviderFault
// ============================================================================

/// provider 내부 오류
///
/// 결과 값과 캐시 엔트리에 저장될 수 있도록 Clone 가능한 값 타입이다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{provider}: {message}")]
pub struct ProviderFault {
    pub provider: String,
    pub message: String,
}

impl ProviderFault {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// FaultPolicy
// ============================================================================

/// composite 순회 중 ProviderFault 처리 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FaultPolicy {
    /// 첫 fault에서 해당 조회를 중단
    #[default]
    FailFast,
    /// 다음 형제 provider를 계속 시도하고, 값이 끝내 없을 때만 fault를 보고
    ContinueSiblings,
}

// ============================================================================
// LineResult - 상태를 담은 조회 결과
// ============================================================================

/// 상태를 담은 조회 결과
#[derive(Debug, Clone)]
pub struct LineResult<T> {
    /// 조회에 사용된 키
    pub key: Line,
    pub status: ResolveStatus,
    pub value: Option<T>,
    /// 값을 만든 provider 이름
    pub provider: Option<Arc<str>>,
    pub fault: Option<ProviderFault>,
}

/// 문자열 조회 결과
pub type LineString = LineResult<Arc<str>>;

/// 바이너리 리소스 조회 결과
pub type LineResource = LineResult<Arc<[u8]>>;

/// 키/컬처 열거 결과
///
/// - `Ok(None)`: 해당 provider가 열거를 지원하지 않음
/// - `Ok(Some(items))`: 열거 결과
/// - `Err(fault)`: provider 오류
pub type Enumeration<T> = std::result::Result<Option<Vec<T>>, ProviderFault>;

impl<T> LineResult<T> {
    pub fn resolved(key: Line, value: T) -> Self {
        Self::with_status(key, ResolveStatus::Resolved, value)
    }

    pub fn with_status(key: Line, status: ResolveStatus, value: T) -> Self {
        Self {
            key,
            status,
            value: Some(value),
            provider: None,
            fault: None,
        }
    }

    pub fn not_found(key: Line) -> Self {
        Self::failed(key, ResolveStatus::NotFound)
    }

    pub fn no_provider(key: Line) -> Self {
        Self::failed(key, ResolveStatus::NoProvider)
    }

    pub fn fault(key: Line, fault: ProviderFault) -> Self {
        Self {
            key,
            status: ResolveStatus::ProviderFault,
            value: None,
            provider: Some(Arc::from(fault.provider.as_str())),
            fault: Some(fault),
        }
    }

    fn failed(key: Line, status: ResolveStatus) -> Self {
        Self {
            key,
            status,
            value: None,
            provider: None,
            fault: None,
        }
    }

    /// provider 이름 기록
    pub fn from_provider(mut self, provider: impl Into<Arc<str>>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// 같은 결과를 다른 (구조적으로 같은) 키로 반환
    pub fn with_key(mut self, key: Line) -> Self {
        self.key = key;
        self
    }

    pub fn severity(&self) -> Severity {
        self.status.severity()
    }

    /// 값이 생성되었는지 (Ok / Warning / Error)
    pub fn has_value(&self) -> bool {
        self.value.is_some() && self.severity() < Severity::Failed
    }

    pub fn is_fault(&self) -> bool {
        self.status == ResolveStatus::ProviderFault
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

impl LineString {
    /// 문자열 값 (없으면 None)
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
