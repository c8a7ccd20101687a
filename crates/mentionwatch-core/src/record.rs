//! Decoding of one input line into a [`Record`].
//!
//! Input lines are JSON objects carrying (at least) `author` and
//! `keyword_mentioned`. Both are optional on the wire; missing values fall
//! back to [`UNKNOWN_AUTHOR`] and [`NONE_KEYWORD`].

use serde_json::{Map, Value};
use thiserror::Error;

/// Author used when a record carries no `author` member (or `null`).
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Sentinel keyword for records without a usable `keyword_mentioned`.
pub const NONE_KEYWORD: &str = "(none)";

const AUTHOR_FIELD: &str = "author";
const KEYWORD_FIELD: &str = "keyword_mentioned";

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// Why a line could not be turned into a [`Record`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One decoded input line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub author: String,
    pub keyword: String,
}

impl Record {
    pub fn new(author: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            keyword: keyword.into(),
        }
    }

    /// Decode a single line of text.
    ///
    /// Surrounding whitespace (including a trailing `\r`) is ignored. Valid
    /// JSON that is not an object is rejected as [`DecodeError::NotAnObject`].
    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(line.trim())?;
        match value {
            Value::Object(fields) => Ok(Self::from_fields(&fields)),
            other => Err(DecodeError::NotAnObject(kind_of(&other))),
        }
    }

    /// Extract author and keyword from an already-parsed JSON object.
    ///
    /// `author` falls back only when absent or `null`. `keyword_mentioned`
    /// falls back whenever it is falsy: absent, `null`, `""`, `false`, `0`,
    /// or an empty array/object. Non-string values are kept as JSON text.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let author = match fields.get(AUTHOR_FIELD) {
            None | Some(Value::Null) => UNKNOWN_AUTHOR.to_string(),
            Some(v) => text_of(v),
        };
        let keyword = match fields.get(KEYWORD_FIELD) {
            Some(v) if is_truthy(v) => text_of(v),
            _ => NONE_KEYWORD.to_string(),
        };
        Self { author, keyword }
    }
}

fn text_of(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
