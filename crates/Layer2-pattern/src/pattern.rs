//! Line Pattern - 컴파일된 양방향 템플릿
//!
//! 한 번 컴파일한 뒤 여러 번 print / parse 한다. 컴파일 후 불변이며 스레드 간 공유 가능.
//!
//! ```text
//! "[{Culture:}]{Section:}{Key}"
//!     print: Culture=en, Section=Ctrl, Key=hello  →  "en:Ctrl:hello"
//!     parse: "Ctrl:hello"                         →  Section=Ctrl, Key=hello
//!     regex: (?s)\A(?:(?P<p0>[^:]*):)?(?P<p1>[^:]*):(?P<p2>.*?)\z
//! ```
//!
//! 빈 값 처리는 `EmptyValuePolicy`를 따른다.
//! - `Distinct`: `""`도 값이다. 그대로 출력하고 빈 캡처도 파라미터로 추가한다.
//! - `TreatAsAbsent`: `""`는 부재다. 출력에서 생략되고 캡처는 한 글자 이상이어야 한다.
//!
//! 파싱 결과의 canonical 파라미터는 템플릿 순서가 아니라 레지스트리 order, 그다음
//! occurrence(`_0`, `_1`, ..., `_n`) 순으로 추가되므로 출력한 라인의 canonical 위치가 복원된다.

use crate::error::{PatternError, Result};
use crate::rules::PatternRules;
use crate::syntax::{parse_template, Element, Node, RawIndex, RawPlaceholder};
use lexline_foundation::{EmptyValuePolicy, KeyComparer, Line, ParameterRegistry};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// 플레이스홀더가 라인의 어떤 값을 가리키는지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    /// non-canonical: tail에 가장 가까운 값
    Effective,
    /// canonical: root부터 센 k번째 값
    Index(usize),
    /// canonical: 마지막 값
    Last,
}

/// 컴파일된 플레이스홀더
#[derive(Debug, Clone)]
pub struct Slot {
    pub name: Arc<str>,
    pub canonical: bool,
    pub occurrence: Occurrence,
    pub prefix: String,
    pub postfix: String,
    pub capture: String,
    pub optional: bool,
    /// canonical 이름의 레지스트리 order
    order: i32,
    group: String,
}

impl Slot {
    /// 파싱 결과에서 canonical 파라미터가 추가되는 순서
    fn append_rank(&self) -> (i32, u8, usize) {
        match self.occurrence {
            Occurrence::Effective => (self.order, 0, 0),
            Occurrence::Index(i) => (self.order, 0, i),
            Occurrence::Last => (self.order, 1, 0),
        }
    }
}

#[derive(Debug, Clone)]
enum Part {
    Literal(String),
    Slot(usize),
}

#[derive(Debug, Clone)]
enum Segment {
    Part(Part),
    Optional(Vec<Part>),
}

/// 컴파일된 템플릿
#[derive(Debug, Clone)]
pub struct LinePattern {
    template: String,
    segments: Vec<Segment>,
    slots: Vec<Slot>,
    regex: Regex,
    empty_policy: EmptyValuePolicy,
}

impl LinePattern {
    /// 규칙 없이 컴파일
    pub fn compile(template: &str, registry: &ParameterRegistry) -> Result<Self> {
        Self::compile_with_rules(template, registry, &PatternRules::default())
    }

    /// 표준 레지스트리로 컴파일
    pub fn standard(template: &str) -> Result<Self> {
        Self::compile(template, &ParameterRegistry::standard())
    }

    /// 레지스트리에서 생성한 기본 템플릿으로 컴파일
    pub fn default_for(registry: &ParameterRegistry, rules: &PatternRules) -> Result<Self> {
        Self::compile_with_rules(&registry.default_template(), registry, rules)
    }

    pub fn compile_with_rules(
        template: &str,
        registry: &ParameterRegistry,
        rules: &PatternRules,
    ) -> Result<Self> {
        Self::compile_with_policy(template, registry, rules, EmptyValuePolicy::default())
    }

    /// 비교기의 레지스트리와 빈 값 정책으로 컴파일
    ///
    /// 이 패턴으로 파싱한 키를 같은 비교기로 조회할 때 사용한다.
    pub fn for_comparer(template: &str, comparer: &KeyComparer, rules: &PatternRules) -> Result<Self> {
        Self::compile_with_policy(template, comparer.registry(), rules, comparer.empty_policy())
    }

    pub fn compile_with_policy(
        template: &str,
        registry: &ParameterRegistry,
        rules: &PatternRules,
        empty_policy: EmptyValuePolicy,
    ) -> Result<Self> {
        let elements = parse_template(template)?;
        let mut compiler = Compiler {
            registry,
            rules,
            slots: Vec::new(),
            counters: HashMap::new(),
        };

        let mut segments = Vec::with_capacity(elements.len());
        for element in elements {
            segments.push(match element {
                Element::Node(node) => Segment::Part(compiler.part(node, false)),
                Element::Optional(nodes) => Segment::Optional(
                    nodes
                        .into_iter()
                        .map(|node| compiler.part(node, true))
                        .collect(),
                ),
            });
        }
        let slots = compiler.slots;

        let allow_empty = empty_policy == EmptyValuePolicy::Distinct;
        let expression = build_regex(&segments, &slots, allow_empty);
        let regex = Regex::new(&expression)
            .map_err(|e| PatternError::invalid(template, format!("capture does not compile: {}", e)))?;

        debug!(
            template,
            regex = %expression,
            slots = slots.len(),
            empty_policy = ?empty_policy,
            "Compiled line pattern"
        );

        Ok(Self {
            template: template.to_string(),
            segments,
            slots,
            regex,
            empty_policy,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn template(&self) -> &str {
        &self.template
    }

    /// 파싱에 쓰이는 정규식
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// 템플릿 순서의 플레이스홀더
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn empty_policy(&self) -> EmptyValuePolicy {
        self.empty_policy
    }

    /// 템플릿이 참조하는 파라미터 이름 (중복 제거, 템플릿 순서)
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for slot in &self.slots {
            if !names.contains(&&*slot.name) {
                names.push(&slot.name);
            }
        }
        names
    }

    // ========================================================================
    // Print
    // ========================================================================

    /// 라인을 문자열로 출력
    ///
    /// 필수 플레이스홀더에 값이 없으면 `PrintFailed`,
    /// 선택 그룹 안의 플레이스홀더에 값이 없으면 그 그룹 전체를 생략한다.
    /// `TreatAsAbsent`에서는 빈 값도 값이 없는 것으로 본다.
    pub fn print(&self, line: &Line) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Part(part) => {
                    if let Err(slot) = self.print_part(part, line, &mut out) {
                        return Err(PatternError::PrintFailed {
                            parameter: slot.name.to_string(),
                        });
                    }
                }
                Segment::Optional(parts) => {
                    let mut group = String::new();
                    let complete = parts
                        .iter()
                        .all(|part| self.print_part(part, line, &mut group).is_ok());
                    if complete {
                        out.push_str(&group);
                    }
                }
            }
        }
        Ok(out)
    }

    fn print_part(&self, part: &Part, line: &Line, out: &mut String) -> std::result::Result<(), &Slot> {
        match part {
            Part::Literal(text) => out.push_str(text),
            Part::Slot(index) => {
                let slot = &self.slots[*index];
                let value = self.value_of(slot, line).ok_or(slot)?;
                out.push_str(&slot.prefix);
                out.push_str(value);
                out.push_str(&slot.postfix);
            }
        }
        Ok(())
    }

    // ========================================================================
    // Parse
    // ========================================================================

    /// 입력이 패턴과 일치하면 캡처된 (이름, 값) 쌍
    ///
    /// 일치하지 않은 선택 그룹의 플레이스홀더는 포함되지 않는다.
    pub fn matches(&self, text: &str) -> Option<PatternMatch> {
        let captures = self.regex.captures(text)?;
        let mut captured: Vec<(&Slot, Arc<str>)> = self
            .slots
            .iter()
            .filter_map(|slot| {
                let value = captures.name(&slot.group)?.as_str();
                if value.is_empty() && self.empty_policy == EmptyValuePolicy::TreatAsAbsent {
                    return None;
                }
                Some((slot, Arc::from(value)))
            })
            .collect();
        order_canonical(&mut captured);

        let values = captured
            .into_iter()
            .map(|(slot, value)| (slot.name.clone(), value))
            .collect();
        Some(PatternMatch { values })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// 입력을 새 라인으로 파싱
    pub fn parse(&self, text: &str) -> Result<Line> {
        self.parse_onto(&Line::root(), text)
    }

    /// 입력을 파싱해 기존 라인 뒤에 이어 붙인다
    pub fn parse_onto(&self, previous: &Line, text: &str) -> Result<Line> {
        self.matches(text)
            .ok_or_else(|| PatternError::ParseFailed {
                input: text.to_string(),
            })?
            .append_to(previous)
    }

    /// 여러 후보를 파싱하고 일치하지 않는 것은 건너뛴다
    pub fn parse_all<I, S>(&self, inputs: I) -> Vec<Line>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = Vec::new();
        let mut skipped = 0usize;
        for input in inputs {
            match self.parse(input.as_ref()) {
                Ok(line) => lines.push(line),
                Err(err) => {
                    skipped += 1;
                    debug!(input = input.as_ref(), error = %err, "Skipping input");
                }
            }
        }
        if skipped > 0 {
            warn!(
                template = %self.template,
                parsed = lines.len(),
                skipped,
                "Some inputs did not match the pattern"
            );
        }
        lines
    }
}

impl fmt::Display for LinePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl LinePattern {
    fn value_of<'a>(&self, slot: &Slot, line: &'a Line) -> Option<&'a str> {
        let value = match slot.occurrence {
            Occurrence::Effective => line.effective_value(&slot.name),
            Occurrence::Index(i) => line.occurrences(&slot.name).get(i).copied(),
            Occurrence::Last => line.occurrences(&slot.name).last().copied(),
        };
        match self.empty_policy {
            EmptyValuePolicy::Distinct => value,
            EmptyValuePolicy::TreatAsAbsent => value.filter(|v| !v.is_empty()),
        }
    }
}

/// canonical 캡처만 (order, occurrence) 순으로 재배치. non-canonical 캡처는 자리를 유지한다.
fn order_canonical(captured: &mut [(&Slot, Arc<str>)]) {
    let positions: Vec<usize> = captured
        .iter()
        .enumerate()
        .filter(|(_, (slot, _))| slot.canonical)
        .map(|(i, _)| i)
        .collect();
    let mut canonical: Vec<(&Slot, Arc<str>)> =
        positions.iter().map(|&i| captured[i].clone()).collect();
    canonical.sort_by_key(|(slot, _)| slot.append_rank());

    for (position, entry) in positions.into_iter().zip(canonical) {
        captured[position] = entry;
    }
}

// ============================================================================
// PatternMatch
// ============================================================================

/// 파싱 결과 (라인을 만들기 전의 캡처 값)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternMatch {
    values: Vec<(Arc<str>, Arc<str>)>,
}

impl PatternMatch {
    /// 이름의 첫 캡처 값
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, v)| &**v)
    }

    /// 추가될 순서의 (이름, 값)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(n, v)| (&**n, &**v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 파라미터를 하나씩 append
    pub fn append_to(&self, previous: &Line) -> Result<Line> {
        self.values.iter().try_fold(previous.clone(), |line, (name, value)| {
            line.append(name, value.clone())
                .map_err(|e| PatternError::InvalidParameter(e.to_string()))
        })
    }
}

// ============================================================================
// Compiler
// ============================================================================

struct Compiler<'a> {
    registry: &'a ParameterRegistry,
    rules: &'a PatternRules,
    slots: Vec<Slot>,
    /// 이름별 인덱스 없는 canonical 플레이스홀더 개수
    counters: HashMap<Arc<str>, usize>,
}

impl Compiler<'_> {
    fn part(&mut self, node: Node, optional: bool) -> Part {
        match node {
            Node::Literal(text) => Part::Literal(text),
            Node::Placeholder(raw) => Part::Slot(self.slot(raw, optional)),
        }
    }

    fn slot(&mut self, raw: RawPlaceholder, optional: bool) -> usize {
        let name = self
            .registry
            .resolve_name(&raw.name)
            .unwrap_or_else(|| Arc::from(raw.name.as_str()));
        let canonical = self.registry.is_canonical(&name);
        let order = self.registry.order(&name).unwrap_or_default();

        let occurrence = match (canonical, raw.index) {
            (false, _) => Occurrence::Effective,
            (true, Some(RawIndex::At(i))) => Occurrence::Index(i),
            (true, Some(RawIndex::Last)) => Occurrence::Last,
            (true, None) => {
                let counter = self.counters.entry(name.clone()).or_insert(0);
                let occurrence = Occurrence::Index(*counter);
                *counter += 1;
                occurrence
            }
        };

        let rule = self.rules.get(&name);
        let pick = |inline: String, ruled: Option<&String>| {
            if inline.is_empty() {
                ruled.cloned().unwrap_or_default()
            } else {
                inline
            }
        };
        let prefix = pick(raw.prefix, rule.and_then(|r| r.prefix.as_ref()));
        let postfix = pick(raw.postfix, rule.and_then(|r| r.postfix.as_ref()));
        let capture = raw
            .regex
            .or_else(|| rule.and_then(|r| r.capture.clone()))
            .unwrap_or_default();

        let index = self.slots.len();
        self.slots.push(Slot {
            name,
            canonical,
            occurrence,
            prefix,
            postfix,
            capture,
            optional,
            order,
            group: format!("p{}", index),
        });
        index
    }
}

// ============================================================================
// Regex
// ============================================================================

/// `allow_empty`: 기본 캡처가 빈 문자열과도 일치하는지
fn build_regex(segments: &[Segment], slots: &[Slot], allow_empty: bool) -> String {
    let mut expression = String::from(r"(?s)\A");

    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Part(part) => {
                let next = match segments.get(i + 1) {
                    Some(Segment::Part(next)) => first_char(next, slots),
                    _ => None,
                };
                push_part(&mut expression, part, next, slots, allow_empty);
            }
            Segment::Optional(parts) => {
                expression.push_str("(?:");
                for (j, part) in parts.iter().enumerate() {
                    let next = parts.get(j + 1).and_then(|next| first_char(next, slots));
                    push_part(&mut expression, part, next, slots, allow_empty);
                }
                expression.push_str(")?");
            }
        }
    }

    expression.push_str(r"\z");
    expression
}

/// 이 요소가 출력될 때 반드시 처음에 오는 문자
fn first_char(part: &Part, slots: &[Slot]) -> Option<char> {
    match part {
        Part::Literal(text) => text.chars().next(),
        Part::Slot(index) => slots[*index].prefix.chars().next(),
    }
}

fn push_part(
    expression: &mut String,
    part: &Part,
    next: Option<char>,
    slots: &[Slot],
    allow_empty: bool,
) {
    match part {
        Part::Literal(text) => expression.push_str(&regex::escape(text)),
        Part::Slot(index) => {
            let slot = &slots[*index];
            let repeat = if allow_empty { '*' } else { '+' };
            let capture = if !slot.capture.is_empty() {
                slot.capture.clone()
            } else {
                match slot.postfix.chars().next().or(next) {
                    Some(stop) => format!("[^{}]{}", regex::escape(&stop.to_string()), repeat),
                    None => format!(".{}?", repeat),
                }
            };
            expression.push_str(&regex::escape(&slot.prefix));
            expression.push_str(&format!("(?P<{}>{})", slot.group, capture));
            expression.push_str(&regex::escape(&slot.postfix));
        }
    }
}
