//! # lexline-foundation
//!
//! Foundation layer for Lexline:
//! - Line: 불변 키 체인 (구조 공유 연결 목록)
//! - Registry: 파라미터 분류 (canonical / non-canonical, order)
//! - Comparer: 구조적 동등성 / 해시 (`KeyComparer`, `LineKey`)
//! - Core: provider / observer trait, 상태 코드가 있는 결과 타입
//! - Cache: LRU 메모 테이블, 해시 조합 유틸리티
//! - Config: 통합 설정 (LexlineConfig), JsonStore
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Line (root ◀── Culture=en ◀── Section=s ◀── Key=k)     │
//! │                     │                                   │
//! │                     ▼                                   │
//! │      KeyComparer (ParameterRegistry + policy)           │
//! │                     │                                   │
//! │          ┌─────────┴─────────┐                         │
//! │          ▼                   ▼                         │
//! │   LinePattern          CachedProvider                  │
//! │   (print / parse)      (CompositeProvider, leaves)     │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod comparer;
pub mod config;
pub mod core;
pub mod error;
pub mod line;
pub mod logging;
pub mod registry;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Core (핵심 Trait 및 타입)
// ============================================================================
pub use core::{
    // Types (types.rs)
    Enumeration,
    FaultPolicy,
    LineResource,
    LineResult,
    LineString,
    ProviderFault,
    ResolveStatus,
    Severity,
    // Traits (traits.rs)
    LineObserver,
    LineProvider,
};

// ============================================================================
// Line (키 체인)
// ============================================================================
pub use line::{validate_name, Line, LineIter, Parameter, ParameterValue};

// ============================================================================
// Registry / Comparer
// ============================================================================
pub use comparer::{EmptyValuePolicy, KeyComparer, KeyParts, LineKey};
pub use registry::{names, ParameterInfo, ParameterRegistry, ParameterRegistryBuilder};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{CacheSettings, LexlineConfig, RuleSetting, LEXLINE_CONFIG_FILE};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::JsonStore;

// ============================================================================
// Cache (메모 테이블 유틸리티)
// ============================================================================
pub use cache::{combine_ordered, combine_unordered, compute_hash, LruCache};
