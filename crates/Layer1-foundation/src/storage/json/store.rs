//! JSON 파일 저장소

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 디렉토리 이름 (글로벌: `<config_dir>/lexline`, 프로젝트: `.lexline`)
const GLOBAL_DIR: &str = "lexline";
const PROJECT_DIR: &str = ".lexline";

/// JSON 설정 저장소
#[derive(Debug, Clone)]
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// 글로벌 설정 (`<config_dir>/lexline/`)
    pub fn global() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot find config directory".to_string()))?
            .join(GLOBAL_DIR);
        Ok(Self::new(dir))
    }

    /// 프로젝트 설정 (`<root>/.lexline/`)
    pub fn project(root: impl Into<PathBuf>) -> Self {
        Self::new(root.into().join(PROJECT_DIR))
    }

    /// 현재 디렉토리 프로젝트 설정
    pub fn current_project() -> Result<Self> {
        Ok(Self::project(std::env::current_dir()?))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.base_dir.join(filename)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.base_dir.exists() {
            std::fs::create_dir_all(&self.base_dir)?;
        }
        Ok(())
    }

    /// JSON 로드 (읽기 실패는 `Error::Io`, 파싱 실패는 `Error::Json`)
    pub fn load<T: DeserializeOwned>(&self, filename: &str) -> Result<T> {
        let path = self.file_path(filename);
        let content = std::fs::read_to_string(&path)?;
        let data = serde_json::from_str(&content).map_err(|e| {
            debug!(path = %path.display(), error = %e, "Failed to parse JSON file");
            e
        })?;
        Ok(data)
    }

    /// JSON 로드 (파일이 없거나 깨졌으면 기본값)
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, filename: &str) -> T {
        self.load(filename).unwrap_or_default()
    }

    /// JSON 로드 (파일이 없으면 None)
    pub fn load_optional<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        let path = self.file_path(filename);
        if !path.exists() {
            return Ok(None);
        }
        self.load(filename).map(Some)
    }

    /// JSON 저장
    ///
    /// 임시 파일에 쓴 뒤 rename 하므로 읽는 쪽은 절반만 쓰인 파일을 보지 않는다.
    pub fn save<T: Serialize>(&self, filename: &str, data: &T) -> Result<()> {
        self.ensure_dir()?;
        let path = self.file_path(filename);
        let content = serde_json::to_string_pretty(data)?;

        let tmp = self.file_path(&format!(".{}.tmp", filename));
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &path)?;

        debug!(path = %path.display(), "Saved JSON file");
        Ok(())
    }
}
