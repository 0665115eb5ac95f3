//! Pattern-specific error types
//!
//! PatternError는 템플릿 컴파일 / 출력 / 파싱 에러를 관리합니다.
//! lexline_foundation::Error와의 변환을 지원합니다.

use lexline_foundation::Error as FoundationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors that can occur while compiling or applying a pattern
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Template text is malformed, or its regex does not compile
    #[error("Invalid pattern '{template}': {reason}")]
    InvalidPattern { template: String, reason: String },

    /// A required placeholder has no value in the line
    #[error("Print failed: required parameter '{parameter}' is missing")]
    PrintFailed { parameter: String },

    /// Input text does not match the pattern (ordinary outcome)
    #[error("Parse failed: '{input}' does not match the pattern")]
    ParseFailed { input: String },

    /// A captured parameter could not be appended to the line
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PatternError {
    pub(crate) fn invalid(template: &str, reason: impl Into<String>) -> Self {
        PatternError::InvalidPattern {
            template: template.to_string(),
            reason: reason.into(),
        }
    }

    /// 정상 흐름에서 분기 대상이 되는 실패인지
    pub fn is_ordinary(&self) -> bool {
        matches!(self, PatternError::ParseFailed { .. })
    }
}

impl From<PatternError> for FoundationError {
    fn from(err: PatternError) -> Self {
        match err {
            PatternError::InvalidPattern { template, reason } => {
                FoundationError::InvalidPattern(format!("{}: {}", template, reason))
            }
            PatternError::PrintFailed { parameter } => FoundationError::PrintFailed(parameter),
            PatternError::ParseFailed { input } => FoundationError::ParseFailed(input),
            PatternError::InvalidParameter(msg) => FoundationError::InvalidParameter(msg),
        }
    }
}
