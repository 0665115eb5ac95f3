//! # lexline-pattern
//!
//! Bidirectional line templates:
//! - Syntax: `{prefix Name_index<regex> postfix}` 플레이스홀더, `[...]` 선택 그룹
//! - Rules: 파라미터별 prefix / postfix / capture (`PatternRules`)
//! - Pattern: 컴파일된 템플릿 (`LinePattern::print`, `parse`, `matches`, `parse_all`)

pub mod error;
pub mod pattern;
pub mod rules;
mod syntax;

// ============================================================================
// Re-exports
// ============================================================================
pub use error::{PatternError, Result};
pub use pattern::{LinePattern, Occurrence, PatternMatch, Slot};
pub use rules::PatternRules;
