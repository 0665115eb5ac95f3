//! Core Traits - 핵심 인터페이스 정의
//!
//! Layer2 이상에서 구현해야 하는 trait들을 정의합니다.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Layer2-provider                                            │
//! │  ├── CompositeProvider (깊이 우선 순회)                      │
//! │  ├── CachedProvider (메모이제이션 + 무효화)                  │
//! │  └── MemoryProvider (메모리 leaf)                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Layer1-Foundation (이 레이어)                              │
//! │  ├── LineProvider / LineObserver trait                      │
//! │  └── LineResult, ResolveStatus, Severity                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use super::types::{Enumeration, LineResource, LineResult, LineString, ProviderFault};
use crate::line::Line;
use std::sync::Arc;

// ============================================================================
// LineProvider - 값 공급자 인터페이스
// ============================================================================

/// 키 체인을 값으로 해석하는 provider
///
/// leaf provider(파일, 메모리 등)와 composite 모두 이 trait을 구현한다.
/// composite 여부는 `children()`이 `Some`을 반환하는지로 구성 시점에 결정된다.
pub trait LineProvider: Send + Sync {
    /// provider 이름 (로그/결과 기록용)
    fn name(&self) -> &str;

    /// 문자열 값 조회
    fn resolve_string(&self, key: &Line) -> LineString;

    /// 바이너리 리소스 조회
    fn resolve_resource(&self, key: &Line) -> LineResource {
        LineResult::not_found(key.clone())
    }

    /// 알려진 모든 키 열거
    fn keys(&self) -> Enumeration<Line> {
        Ok(None)
    }

    /// 지원하는 컬처 열거
    fn cultures(&self) -> Enumeration<String> {
        Ok(None)
    }

    /// 원본 데이터 다시 읽기
    fn reload(&self) -> Result<(), ProviderFault> {
        Ok(())
    }

    /// composite인 경우 자식 provider들 (등록 순서)
    fn children(&self) -> Option<&[Arc<dyn LineProvider>]> {
        None
    }
}

// ============================================================================
// LineObserver - 조회 결과 관찰자
// ============================================================================

/// 라인에 `Logger`로 연결되는 관찰자
///
/// `Line::resolve_string()` / `Line::resolve_resource()` 호출마다 한 번씩 통지된다.
pub trait LineObserver: Send + Sync {
    fn on_string(&self, _result: &LineString) {}

    fn on_resource(&self, _result: &LineResource) {}
}
