//! Error types for Lexline
//!
//! 모든 에러를 중앙에서 관리

use crate::core::ProviderFault;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Lexline 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Line 구성 관련
    // ========================================================================
    /// 잘못된 파라미터 이름/값 (라인 생성 시점에 즉시 거부)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // ========================================================================
    // 패턴 관련
    // ========================================================================
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// 필수 플레이스홀더의 파라미터가 없음
    #[error("Print failed: required parameter '{0}' is missing")]
    PrintFailed(String),

    /// 입력이 패턴과 일치하지 않음
    #[error("Parse failed: '{0}' does not match the pattern")]
    ParseFailed(String),

    // ========================================================================
    // Provider 관련
    // ========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Provider fault: {0}")]
    ProviderFault(#[from] ProviderFault),

    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 호출자가 일상적으로 분기하는 "결과" 성격의 에러인지 확인
    ///
    /// NotFound / ParseFailed 는 다음 후보를 시도하는 식으로 처리되는 값이다.
    pub fn is_ordinary(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::ParseFailed(_))
    }

    /// 프로그래밍 계약 위반 (잘못된 식별자/템플릿)인지 확인
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::InvalidParameter(_) | Error::InvalidPattern(_))
    }

    /// InvalidParameter 생성 헬퍼
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Error::InvalidParameter(message.into())
    }
}
