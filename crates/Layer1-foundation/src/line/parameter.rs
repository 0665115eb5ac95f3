//! Parameter - (이름, 값) 쌍

use crate::core::{LineObserver, LineProvider};
use crate::{Error, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 파라미터 값
///
/// 문자열 축(Culture, Key ...)은 `Text`, 문자열이 아닌 축은 명시적 variant로 구분한다.
/// `Observer` / `Provider`는 키의 일부가 아닌 첨부물이다.
#[derive(Clone)]
pub enum ParameterValue {
    Text(Arc<str>),
    Observer(Arc<dyn LineObserver>),
    Provider(Arc<dyn LineProvider>),
}

impl ParameterValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ParameterValue::Text(_))
    }
}

impl PartialEq for ParameterValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParameterValue::Text(a), ParameterValue::Text(b)) => a == b,
            (ParameterValue::Observer(a), ParameterValue::Observer(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (ParameterValue::Provider(a), ParameterValue::Provider(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl Eq for ParameterValue {}

impl Hash for ParameterValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ParameterValue::Text(text) => {
                state.write_u8(0);
                text.hash(state);
            }
            ParameterValue::Observer(observer) => {
                state.write_u8(1);
                (Arc::as_ptr(observer) as *const () as usize).hash(state);
            }
            ParameterValue::Provider(provider) => {
                state.write_u8(2);
                (Arc::as_ptr(provider) as *const () as usize).hash(state);
            }
        }
    }
}

impl fmt::Debug for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Text(text) => write!(f, "{:?}", text),
            ParameterValue::Observer(_) => f.write_str("<observer>"),
            ParameterValue::Provider(provider) => write!(f, "<provider {}>", provider.name()),
        }
    }
}

/// 불변 (이름, 값) 쌍
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    name: Arc<str>,
    value: ParameterValue,
}

impl Parameter {
    /// 문자열 파라미터 생성 (이름 검증)
    pub fn new(name: &str, value: impl Into<Arc<str>>) -> Result<Self> {
        validate_name(name)?;
        Ok(Self::text_unchecked(Arc::from(name), value.into()))
    }

    /// 첨부물 파라미터 생성 (이름 검증)
    pub fn attachment(name: &str, value: ParameterValue) -> Result<Self> {
        validate_name(name)?;
        Ok(Self {
            name: Arc::from(name),
            value,
        })
    }

    /// 이미 검증된 이름으로 생성 (표준 이름 상수용)
    pub(crate) fn text_unchecked(name: Arc<str>, value: Arc<str>) -> Self {
        Self {
            name,
            value: ParameterValue::Text(value),
        }
    }

    pub(crate) fn attachment_unchecked(name: &'static str, value: ParameterValue) -> Self {
        Self {
            name: Arc::from(name),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    pub fn value(&self) -> &ParameterValue {
        &self.value
    }

    /// 문자열 값 (첨부물이면 None)
    pub fn text(&self) -> Option<&str> {
        self.value.as_text()
    }

    pub(crate) fn text_arc(&self) -> Option<&Arc<str>> {
        match &self.value {
            ParameterValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// 파라미터 이름 검증: `[A-Za-z][A-Za-z0-9]*`
///
/// 패턴 템플릿의 `{Section_0}` 인덱스 표기와 충돌하지 않도록 `_`는 허용하지 않는다.
pub fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    match chars.next() {
        None => Err(Error::invalid_parameter("parameter name is empty")),
        Some(first) if !first.is_ascii_alphabetic() => Err(Error::invalid_parameter(format!(
            "parameter name '{}' must start with an ASCII letter",
            name
        ))),
        Some(_) => {
            if chars.all(|c| c.is_ascii_alphanumeric()) {
                Ok(())
            } else {
                Err(Error::invalid_parameter(format!(
                    "parameter name '{}' may only contain ASCII letters and digits",
                    name
                )))
            }
        }
    }
}
