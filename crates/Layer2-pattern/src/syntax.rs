//! Template syntax
//!
//! ```text
//! template    := (literal | placeholder | group)*
//! group       := '[' (literal | placeholder)* ']'          (중첩 불가)
//! placeholder := '{' prefix Name ('_' (digits | 'n'))? ('<' regex '>')? postfix '}'
//! Name        := [A-Za-z][A-Za-z0-9]*
//! ```
//!
//! - `prefix`는 이름을 시작할 수 없는 문자들 (`{/Location}`의 `/`)
//! - `\`는 리터럴 / prefix / postfix에서 `{ } [ ] \`를 이스케이프한다
//! - regex 안에서는 `\>`만 `>`로 바뀌고 나머지 `\x`는 그대로 정규식에 전달된다

use crate::error::{PatternError, Result};
use std::iter::Peekable;
use std::str::Chars;

/// 같은 이름의 몇 번째 occurrence인지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawIndex {
    /// `_0`, `_1`, ...
    At(usize),
    /// `_n` (마지막)
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawPlaceholder {
    pub prefix: String,
    pub name: String,
    pub index: Option<RawIndex>,
    pub regex: Option<String>,
    pub postfix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Literal(String),
    Placeholder(RawPlaceholder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Element {
    Node(Node),
    Optional(Vec<Node>),
}

/// 템플릿을 구문 요소로 분해
pub(crate) fn parse_template(template: &str) -> Result<Vec<Element>> {
    let mut elements = Vec::new();
    let mut group: Option<Vec<Node>> = None;
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| PatternError::invalid(template, "dangling escape at end"))?;
                literal.push(escaped);
            }
            '{' => {
                flush(&mut literal, &mut elements, &mut group);
                let placeholder = parse_placeholder(template, &mut chars)?;
                push(Node::Placeholder(placeholder), &mut elements, &mut group);
            }
            '[' => {
                if group.is_some() {
                    return Err(PatternError::invalid(template, "optional groups cannot nest"));
                }
                flush(&mut literal, &mut elements, &mut group);
                group = Some(Vec::new());
            }
            ']' => {
                flush(&mut literal, &mut elements, &mut group);
                let nodes = group
                    .take()
                    .ok_or_else(|| PatternError::invalid(template, "unmatched ']'"))?;
                elements.push(Element::Optional(nodes));
            }
            '}' => return Err(PatternError::invalid(template, "unmatched '}'")),
            _ => literal.push(c),
        }
    }

    if group.is_some() {
        return Err(PatternError::invalid(template, "unclosed '['"));
    }
    flush(&mut literal, &mut elements, &mut group);
    Ok(elements)
}

fn flush(literal: &mut String, elements: &mut Vec<Element>, group: &mut Option<Vec<Node>>) {
    if !literal.is_empty() {
        push(Node::Literal(std::mem::take(literal)), elements, group);
    }
}

fn push(node: Node, elements: &mut Vec<Element>, group: &mut Option<Vec<Node>>) {
    match group {
        Some(nodes) => nodes.push(node),
        None => elements.push(Element::Node(node)),
    }
}

fn parse_placeholder(template: &str, chars: &mut Peekable<Chars<'_>>) -> Result<RawPlaceholder> {
    let mut prefix = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphabetic() || c == '}' || c == '<' {
            break;
        }
        chars.next();
        prefix.push(escaped(template, c, chars)?);
    }

    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        let valid = if name.is_empty() {
            c.is_ascii_alphabetic()
        } else {
            c.is_ascii_alphanumeric()
        };
        if !valid {
            break;
        }
        name.push(c);
        chars.next();
    }
    if name.is_empty() {
        return Err(PatternError::invalid(template, "placeholder without a parameter name"));
    }

    let mut index = None;
    if chars.peek() == Some(&'_') {
        chars.next();
        index = Some(parse_index(template, &name, chars)?);
    }

    let mut regex = None;
    if chars.peek() == Some(&'<') {
        chars.next();
        regex = Some(parse_regex(template, &name, chars)?);
    }

    let mut postfix = String::new();
    loop {
        match chars.next() {
            Some('}') => break,
            Some(c) => postfix.push(escaped(template, c, chars)?),
            None => return Err(PatternError::invalid(template, "unclosed '{'")),
        }
    }

    Ok(RawPlaceholder {
        prefix,
        name,
        index,
        regex,
        postfix,
    })
}

fn parse_index(template: &str, name: &str, chars: &mut Peekable<Chars<'_>>) -> Result<RawIndex> {
    if chars.peek() == Some(&'n') {
        chars.next();
        return Ok(RawIndex::Last);
    }
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits.parse().map(RawIndex::At).map_err(|_| {
        PatternError::invalid(
            template,
            format!("'{}_' must be followed by an index or 'n'", name),
        )
    })
}

fn parse_regex(template: &str, name: &str, chars: &mut Peekable<Chars<'_>>) -> Result<String> {
    let mut regex = String::new();
    loop {
        match chars.next() {
            Some('>') => break,
            Some('\\') if chars.peek() == Some(&'>') => {
                chars.next();
                regex.push('>');
            }
            Some('\\') => {
                regex.push('\\');
                if let Some(next) = chars.next() {
                    regex.push(next);
                }
            }
            Some(c) => regex.push(c),
            None => {
                return Err(PatternError::invalid(
                    template,
                    format!("unclosed '<' in capture of '{}'", name),
                ))
            }
        }
    }
    if regex.is_empty() {
        return Err(PatternError::invalid(
            template,
            format!("empty capture expression for '{}'", name),
        ));
    }
    Ok(regex)
}

fn escaped(template: &str, c: char, chars: &mut Peekable<Chars<'_>>) -> Result<char> {
    if c != '\\' {
        return Ok(c);
    }
    chars
        .next()
        .ok_or_else(|| PatternError::invalid(template, "dangling escape at end"))
}
