//! Core Module - 핵심 인터페이스 및 타입
//!
//! Lexline의 Provider 경계를 정의합니다.
//!
//! ## 타입 계층
//!
//! - `types.rs`: 결과 타입 (Severity, ResolveStatus, LineResult, ProviderFault)
//! - `traits.rs`: 인터페이스 (LineProvider, LineObserver)
//!
//! ## 조회 흐름
//!
//! ```text
//! ┌───────────────┐   resolve(Line)   ┌────────────────┐
//! │    caller     │ ────────────────▶ │ CachedProvider │ ── hit ──▶ LineResult
//! └───────────────┘                   └───────┬────────┘
//!                                             │ miss
//!                                             ▼
//!                                   ┌──────────────────┐
//!                                   │ CompositeProvider│  depth-first,
//!                                   │  ├── leaf #1     │  first value wins
//!                                   │  └── composite   │
//!                                   │       └── leaf #2│
//!                                   └──────────────────┘
//! ```

pub mod traits;
pub mod types;

pub use traits::{LineObserver, LineProvider};
pub use types::{
    Enumeration, FaultPolicy, LineResource, LineResult, LineString, ProviderFault, ResolveStatus,
    Severity,
};
