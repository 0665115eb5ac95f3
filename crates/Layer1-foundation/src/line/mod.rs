//! Line - 불변 키 체인
//!
//! 라인은 꼬리(tail) 노드로 식별되는 단방향 연결 목록이다.
//! 각 노드는 0~1개의 파라미터와 이전 노드(루트 방향) 참조를 갖는다.
//!
//! ```text
//!   root ◀── Culture=en ◀── Section=MyController ◀── Key=hello   (tail)
//!                   ▲
//!                   └──── Section=Other ◀── Key=bye               (다른 tail)
//! ```
//!
//! - `append`는 노드 하나만 할당하고 원래 tail은 절대 변경하지 않는다.
//! - 노드는 `Arc`로 공유되므로 여러 파생 체인이 같은 접두부를 가리킬 수 있다.
//! - 노드는 자신보다 먼저 만들어진 노드만 참조하므로 순환이 생기지 않는다.

mod parameter;

pub use parameter::{validate_name, Parameter, ParameterValue};

use crate::core::{LineObserver, LineProvider, LineResource, LineResult, LineString};
use crate::registry::names;
use crate::Result;
use std::fmt;
use std::sync::Arc;

/// 키 체인 (tail 노드 핸들)
///
/// clone은 `Arc` 포인터 복사이다.
#[derive(Clone)]
pub struct Line(Arc<LineNode>);

struct LineNode {
    parameter: Option<Parameter>,
    previous: Option<Line>,
}

impl Drop for LineNode {
    // 긴 체인에서 재귀 drop으로 스택이 넘치지 않도록 반복문으로 해제
    fn drop(&mut self) {
        let mut previous = self.previous.take();
        while let Some(line) = previous {
            match Arc::try_unwrap(line.0) {
                Ok(mut node) => previous = node.previous.take(),
                Err(_) => break,
            }
        }
    }
}

impl Line {
    /// 새 루트 (파라미터 없음, previous 없음)
    pub fn root() -> Self {
        Line(Arc::new(LineNode {
            parameter: None,
            previous: None,
        }))
    }

    // ========================================================================
    // 파생 (derivation)
    // ========================================================================

    /// 문자열 파라미터 추가. 이름이 잘못되면 `InvalidParameter`.
    pub fn append(&self, name: &str, value: impl Into<Arc<str>>) -> Result<Line> {
        Ok(self.append_parameter(Parameter::new(name, value)?))
    }

    /// 검증된 파라미터 추가 (O(1), 노드 하나 할당)
    pub fn append_parameter(&self, parameter: Parameter) -> Line {
        Line(Arc::new(LineNode {
            parameter: Some(parameter),
            previous: Some(self.clone()),
        }))
    }

    fn append_standard(&self, name: &'static str, value: impl Into<Arc<str>>) -> Line {
        self.append_parameter(Parameter::text_unchecked(Arc::from(name), value.into()))
    }

    pub fn culture(&self, value: impl Into<Arc<str>>) -> Line {
        self.append_standard(names::CULTURE, value)
    }

    pub fn format(&self, value: impl Into<Arc<str>>) -> Line {
        self.append_standard(names::FORMAT, value)
    }

    pub fn location(&self, value: impl Into<Arc<str>>) -> Line {
        self.append_standard(names::LOCATION, value)
    }

    pub fn assembly(&self, value: impl Into<Arc<str>>) -> Line {
        self.append_standard(names::ASSEMBLY, value)
    }

    pub fn resource(&self, value: impl Into<Arc<str>>) -> Line {
        self.append_standard(names::RESOURCE, value)
    }

    pub fn type_name(&self, value: impl Into<Arc<str>>) -> Line {
        self.append_standard(names::TYPE, value)
    }

    pub fn section(&self, value: impl Into<Arc<str>>) -> Line {
        self.append_standard(names::SECTION, value)
    }

    pub fn key(&self, value: impl Into<Arc<str>>) -> Line {
        self.append_standard(names::KEY, value)
    }

    /// 관찰자 첨부 (`Logger`)
    pub fn with_observer(&self, observer: Arc<dyn LineObserver>) -> Line {
        self.append_parameter(Parameter::attachment_unchecked(
            names::LOGGER,
            ParameterValue::Observer(observer),
        ))
    }

    /// provider 첨부 (`Asset`)
    pub fn with_provider(&self, provider: Arc<dyn LineProvider>) -> Line {
        self.append_parameter(Parameter::attachment_unchecked(
            names::ASSET,
            ParameterValue::Provider(provider),
        ))
    }

    // ========================================================================
    // 구조 조회
    // ========================================================================

    pub fn previous(&self) -> Option<&Line> {
        self.0.previous.as_ref()
    }

    /// 이 노드의 파라미터 (루트는 None)
    pub fn parameter(&self) -> Option<&Parameter> {
        self.0.parameter.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.0.previous.is_none()
    }

    /// 같은 노드인지 (참조 동일성)
    pub fn ptr_eq(&self, other: &Line) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// tail → root 순서로 노드 순회 (재시작 가능, 유한)
    pub fn iter(&self) -> LineIter<'_> {
        LineIter { next: Some(self) }
    }

    /// tail → root 순서의 파라미터
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.iter().filter_map(Line::parameter)
    }

    /// tail → root 방향으로 처음 조건을 만족하는 노드
    pub fn find<P>(&self, mut predicate: P) -> Option<&Line>
    where
        P: FnMut(&Line) -> bool,
    {
        self.iter().find(|&line| predicate(line))
    }

    /// root → tail 순서의 파라미터 배열 (필터 적용)
    pub fn to_ordered_vec<F>(&self, mut filter: F) -> Vec<&Parameter>
    where
        F: FnMut(&Parameter) -> bool,
    {
        let mut parameters: Vec<&Parameter> = self.parameters().filter(|&p| filter(p)).collect();
        parameters.reverse();
        parameters
    }

    /// 파라미터 개수
    pub fn len(&self) -> usize {
        self.parameters().count()
    }

    /// 루트만 파라미터가 없다
    pub fn is_empty(&self) -> bool {
        self.parameter().is_none()
    }

    // ========================================================================
    // 값 조회
    // ========================================================================

    /// tail에 가장 가까운 문자열 값 (non-canonical 유효 값 규칙)
    pub fn effective_value(&self, name: &str) -> Option<&str> {
        self.parameters()
            .filter(|p| p.name() == name)
            .find_map(Parameter::text)
    }

    /// 이름의 모든 문자열 값, root → tail 순서 (canonical 누적 규칙)
    pub fn occurrences(&self, name: &str) -> Vec<&str> {
        let mut values: Vec<&str> = self
            .parameters()
            .filter(|p| p.name() == name)
            .filter_map(Parameter::text)
            .collect();
        values.reverse();
        values
    }

    /// 첨부된 관찰자들 (tail → root)
    pub fn observers(&self) -> impl Iterator<Item = &Arc<dyn LineObserver>> {
        self.parameters().filter_map(|p| match p.value() {
            ParameterValue::Observer(observer) => Some(observer),
            _ => None,
        })
    }

    /// tail에 가장 가까운 첨부 provider
    pub fn provider(&self) -> Option<&Arc<dyn LineProvider>> {
        self.parameters().find_map(|p| match p.value() {
            ParameterValue::Provider(provider) => Some(provider),
            _ => None,
        })
    }

    // ========================================================================
    // 첨부 provider를 통한 조회
    // ========================================================================

    /// 첨부 provider로 문자열 조회 후 관찰자들에게 통지
    pub fn resolve_string(&self) -> LineString {
        let result = match self.provider() {
            Some(provider) => provider.resolve_string(self),
            None => LineResult::no_provider(self.clone()),
        };
        for observer in self.observers() {
            observer.on_string(&result);
        }
        result
    }

    /// 첨부 provider로 리소스 조회 후 관찰자들에게 통지
    pub fn resolve_resource(&self) -> LineResource {
        let result = match self.provider() {
            Some(provider) => provider.resolve_resource(self),
            None => LineResult::no_provider(self.clone()),
        };
        for observer in self.observers() {
            observer.on_resource(&result);
        }
        result
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::root()
    }
}

/// tail → root 노드 반복자
pub struct LineIter<'a> {
    next: Option<&'a Line>,
}

impl<'a> Iterator for LineIter<'a> {
    type Item = &'a Line;

    fn next(&mut self) -> Option<&'a Line> {
        let current = self.next?;
        self.next = current.previous();
        Some(current)
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.to_ordered_vec(|_| true)
                    .into_iter()
                    .map(|p| (p.name(), p.value())),
            )
            .finish()
    }
}

/// `Culture:en:Section:MyController:Key:hello` 형식 (root → tail, 문자열 값만)
///
/// `:`와 `\`는 `\`로 이스케이프된다.
impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for parameter in self.to_ordered_vec(|p| p.value().is_text()) {
            if !first {
                f.write_str(":")?;
            }
            first = false;
            write_escaped(f, parameter.name())?;
            f.write_str(":")?;
            write_escaped(f, parameter.text().unwrap_or_default())?;
        }
        Ok(())
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        if c == ':' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}
