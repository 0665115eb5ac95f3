//! Tracing 초기화
//!
//! 라이브러리 코드는 `tracing` 매크로만 사용한다. subscriber 설치는 애플리케이션 진입점
//! (또는 테스트)이 이 함수들로 한 번 수행한다. `RUST_LOG`가 설정되어 있으면 우선한다.

use crate::{Error, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// 전역 subscriber 설치. 이미 설치되어 있으면 `Error::Config`.
pub fn try_init_tracing(level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter(level))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {}", e)))
}

/// 전역 subscriber 설치 (이미 설치되어 있으면 조용히 무시)
pub fn init_tracing(level: &str) {
    let _ = try_init_tracing(level);
}

/// 테스트용: 출력이 테스트 하니스에 캡처되는 subscriber
pub fn init_test_tracing() {
    let _ = tracing_subscriber::registry()
        .with(filter("debug"))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
