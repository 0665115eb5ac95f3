//! Config - 통합 설정 관리
//!
//! - `lexline.rs` - LexlineConfig (파라미터 분류, 정책, 캐시, 패턴 규칙)

mod lexline;

pub use lexline::{CacheSettings, LexlineConfig, RuleSetting, LEXLINE_CONFIG_FILE};
