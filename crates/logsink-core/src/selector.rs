//! Selector — the compiled form of the `log.expression` property.
//!
//! Expressions are parsed once, when properties load, into a small closed
//! set of variants. Nothing is interpreted per message beyond walking the
//! compiled path and applying its transforms.
//!
//! # Grammar
//!
//! ```text
//! selector   := "#this" | "#root" | root accessor* method*
//! root       := "payload" | "headers"
//! accessor   := "." ident | "[" quoted "]"
//! method     := "." ("toUpperCase" | "toLowerCase" | "trim" | "toString" | "length") "()"
//! ```
//!
//! # Evaluation
//!
//! | Situation | Result |
//! |-----------|--------|
//! | missing header | `null` |
//! | property on a non-object payload | [`EvaluationError::TypeMismatch`] |
//! | missing property on an object | [`EvaluationError::UnknownField`] |
//! | string method on a non-string | [`EvaluationError::TypeMismatch`] |

use bytes::Bytes;
use serde_json::Value;

use crate::error::{EvaluationError, ExpressionError};
use crate::types::{Message, Payload};
use crate::value::LogValue;

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum Selector {
    /// `#this`: the whole (normalized) message.
    WholeMessage,
    /// A projection over one of the message's fields.
    Field(Projection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub source: Source,
    /// Property path below the source. For [`Source::Headers`] the first
    /// segment names the header.
    pub path: Vec<String>,
    pub transforms: Vec<Transform>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Payload,
    Headers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    ToUpperCase,
    ToLowerCase,
    Trim,
    ToString,
    Length,
}

impl Transform {
    fn from_method(name: &str) -> Result<Self, ExpressionError> {
        match name {
            "toUpperCase" => Ok(Transform::ToUpperCase),
            "toLowerCase" => Ok(Transform::ToLowerCase),
            "trim" => Ok(Transform::Trim),
            "toString" => Ok(Transform::ToString),
            "length" => Ok(Transform::Length),
            other => Err(ExpressionError::UnknownMethod(other.to_string())),
        }
    }

    fn method(self) -> &'static str {
        match self {
            Transform::ToUpperCase => "toUpperCase",
            Transform::ToLowerCase => "toLowerCase",
            Transform::Trim => "trim",
            Transform::ToString => "toString",
            Transform::Length => "length",
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Selector::payload()
    }
}

impl Selector {
    /// The bare `payload` selector.
    pub fn payload() -> Self {
        Selector::Field(Projection {
            source: Source::Payload,
            path: Vec::new(),
            transforms: Vec::new(),
        })
    }

    pub fn parse(expression: &str) -> Result<Self, ExpressionError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(ExpressionError::Empty);
        }
        if expression == "#this" || expression == "#root" {
            return Ok(Selector::WholeMessage);
        }
        if expression.starts_with('#') {
            return Err(ExpressionError::UnknownRoot(expression.to_string()));
        }

        let mut parser = Parser::new(expression);
        let source = match parser.ident() {
            Some("payload") => Source::Payload,
            Some("headers") => Source::Headers,
            Some(other) => return Err(ExpressionError::UnknownRoot(other.to_string())),
            None => return Err(parser.syntax("expected `#this`, `payload` or `headers`")),
        };

        let mut path = Vec::new();
        let mut transforms = Vec::new();
        loop {
            parser.skip_ws();
            match parser.peek() {
                None => break,
                Some('.') => {
                    parser.bump();
                    parser.skip_ws();
                    let name = parser
                        .ident()
                        .ok_or_else(|| parser.syntax("expected a name after `.`"))?;
                    parser.skip_ws();
                    if parser.eat('(') {
                        parser.skip_ws();
                        if !parser.eat(')') {
                            return Err(parser.syntax("methods take no arguments"));
                        }
                        transforms.push(Transform::from_method(name)?);
                    } else if !transforms.is_empty() {
                        return Err(parser.syntax("property access after a method call"));
                    } else {
                        path.push(name.to_string());
                    }
                }
                Some('[') => {
                    parser.bump();
                    parser.skip_ws();
                    let key = parser.quoted()?;
                    parser.skip_ws();
                    if !parser.eat(']') {
                        return Err(parser.syntax("expected `]`"));
                    }
                    if !transforms.is_empty() {
                        return Err(parser.syntax("property access after a method call"));
                    }
                    path.push(key);
                }
                Some(_) => return Err(parser.syntax("unexpected character")),
            }
        }

        Ok(Selector::Field(Projection {
            source,
            path,
            transforms,
        }))
    }

    pub fn is_whole_message(&self) -> bool {
        matches!(self, Selector::WholeMessage)
    }

    /// Resolve this selector against `message`.
    pub fn evaluate<'m>(&self, message: &'m Message) -> Result<LogValue<'m>, EvaluationError> {
        match self {
            Selector::WholeMessage => Ok(LogValue::Message(message)),
            Selector::Field(projection) => projection.evaluate(message),
        }
    }
}

impl Projection {
    fn evaluate<'m>(&self, message: &'m Message) -> Result<LogValue<'m>, EvaluationError> {
        let mut current = match self.source {
            Source::Payload => {
                let base = match message.payload() {
                    Payload::Bytes(bytes) => Current::Bytes(bytes.clone()),
                    Payload::Text(text) => Current::Json(Value::String(text.clone())),
                    Payload::Structured(value) => Current::Json(value.clone()),
                };
                descend(base, &self.path, "payload")?
            }
            Source::Headers => match self.path.split_first() {
                None => Current::Json(Value::Object(
                    message
                        .headers()
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                )),
                Some((name, rest)) => {
                    let header = message.header(name).cloned().unwrap_or(Value::Null);
                    descend(Current::Json(header), rest, &format!("headers.{name}"))?
                }
            },
        };

        for transform in &self.transforms {
            current = current.apply(*transform)?;
        }

        Ok(match current {
            Current::Bytes(bytes) => LogValue::Bytes(bytes),
            Current::Json(value) => LogValue::Json(value),
        })
    }
}

/// Intermediate value while walking a projection.
enum Current {
    Bytes(Bytes),
    Json(Value),
}

impl Current {
    fn kind(&self) -> &'static str {
        match self {
            Current::Bytes(_) => "bytes",
            Current::Json(value) => json_kind(value),
        }
    }

    fn mismatch(&self, operation: String) -> EvaluationError {
        EvaluationError::TypeMismatch {
            operation,
            found: self.kind(),
        }
    }

    fn apply(self, transform: Transform) -> Result<Current, EvaluationError> {
        let operation = || format!("{}()", transform.method());
        match transform {
            Transform::ToUpperCase | Transform::ToLowerCase | Transform::Trim => match self {
                Current::Json(Value::String(s)) => Ok(Current::Json(Value::String(match transform {
                    Transform::ToUpperCase => s.to_uppercase(),
                    Transform::ToLowerCase => s.to_lowercase(),
                    _ => s.trim().to_string(),
                }))),
                other => Err(other.mismatch(operation())),
            },
            Transform::ToString => Ok(Current::Json(Value::String(match self {
                Current::Bytes(bytes) => format!("byte[{}]", bytes.len()),
                Current::Json(Value::String(s)) => s,
                Current::Json(other) => other.to_string(),
            }))),
            Transform::Length => {
                let len = match &self {
                    Current::Bytes(bytes) => bytes.len(),
                    Current::Json(Value::String(s)) => s.chars().count(),
                    Current::Json(Value::Array(items)) => items.len(),
                    Current::Json(Value::Object(map)) => map.len(),
                    _ => return Err(self.mismatch(operation())),
                };
                Ok(Current::Json(Value::from(len)))
            }
        }
    }
}

fn descend(mut current: Current, path: &[String], origin: &str) -> Result<Current, EvaluationError> {
    let mut walked = origin.to_string();
    for segment in path {
        walked.push('.');
        walked.push_str(segment);
        current = match current {
            Current::Json(Value::Object(mut map)) => match map.remove(segment) {
                Some(value) => Current::Json(value),
                None => return Err(EvaluationError::UnknownField(walked)),
            },
            Current::Json(Value::Array(mut items)) => match segment.parse::<usize>() {
                Ok(index) if index < items.len() => Current::Json(items.swap_remove(index)),
                Ok(_) => return Err(EvaluationError::UnknownField(walked)),
                Err(_) => {
                    return Err(EvaluationError::TypeMismatch {
                        operation: format!("property `{segment}`"),
                        found: "array",
                    })
                }
            },
            other => return Err(other.mismatch(format!("property `{segment}`"))),
        };
    }
    Ok(current)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl std::str::FromStr for Selector {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl TryFrom<String> for Selector {
    type Error = ExpressionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Selector::parse(&value)
    }
}

/// Renders the canonical expression, e.g. `headers['content-type'].trim()`.
impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let projection = match self {
            Selector::WholeMessage => return f.write_str("#this"),
            Selector::Field(projection) => projection,
        };
        f.write_str(match projection.source {
            Source::Payload => "payload",
            Source::Headers => "headers",
        })?;
        for segment in &projection.path {
            if is_ident(segment) {
                write!(f, ".{segment}")?;
            } else {
                write!(f, "['{}']", segment.replace('\'', "\\'"))?;
            }
        }
        for transform in &projection.transforms {
            write!(f, ".{}()", transform.method())?;
        }
        Ok(())
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {}
            _ => return None,
        }
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        Some(&self.src[start..self.pos])
    }

    fn quoted(&mut self) -> Result<String, ExpressionError> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.syntax("expected a quoted key")),
        };
        self.bump();
        let mut key = String::new();
        loop {
            match self.bump() {
                None => return Err(self.syntax("unterminated string")),
                Some('\\') => match self.bump() {
                    Some(c) => key.push(c),
                    None => return Err(self.syntax("unterminated string")),
                },
                Some(c) if c == quote => return Ok(key),
                Some(c) => key.push(c),
            }
        }
    }

    fn syntax(&self, reason: &'static str) -> ExpressionError {
        ExpressionError::Syntax {
            offset: self.pos,
            reason,
        }
    }
}
