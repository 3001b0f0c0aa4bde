//! Typed OSC arguments and the codec that turns operator text into values.
//!
//! An operator types an argument as free text and picks a declared type from a
//! closed set: `int`, `float`, `string`, or `bool`.  The text is stored as-is
//! until send time; only then is it converted.  Conversion is all-or-nothing
//! per message: [`encode_all`] visits arguments in declaration order and stops
//! at the first one that does not convert.
//!
//! # Grammar
//!
//! | Kind     | Accepted text                                   | OSC type tag |
//! |----------|-------------------------------------------------|--------------|
//! | `int`    | base-10 signed 32-bit integer (`-12`, `+7`)     | `i`          |
//! | `float`  | 32-bit IEEE-754 float, finite unless spelled `inf`/`infinity`/`NaN` | `f` |
//! | `string` | anything, taken verbatim                        | `s`          |
//! | `bool`   | `1 t T true True TRUE` / `0 f F false False FALSE` | `T` / `F` |

use std::fmt;
use std::str::FromStr;

use rosc::OscType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when argument text cannot be converted to its declared kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field} conversion failed for input {input:?}")]
pub struct ConversionError {
    /// Name of the declared kind (`"int"`, `"float"`, `"bool"`).
    pub field: &'static str,
    /// The raw text that failed to convert.
    pub input: String,
}

/// Error returned when a kind name is not one of the four supported kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown argument type {0:?} (expected int, float, string or bool)")]
pub struct UnknownKind(pub String);

/// The declared type of an OSC argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    #[default]
    Int,
    Float,
    String,
    Bool,
}

impl ArgKind {
    /// Every supported kind, in the order a type picker shows them.
    pub const ALL: [ArgKind; 4] = [ArgKind::Int, ArgKind::Float, ArgKind::String, ArgKind::Bool];

    /// The lowercase name used in configuration files and history lines.
    pub fn as_str(self) -> &'static str {
        match self {
            ArgKind::Int => "int",
            ArgKind::Float => "float",
            ArgKind::String => "string",
            ArgKind::Bool => "bool",
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArgKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArgKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A successfully converted argument value.
///
/// Invalid kinds are unrepresentable: every variant carries its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Int(i32),
    Float(f32),
    String(String),
    Bool(bool),
}

impl From<TypedValue> for OscType {
    fn from(value: TypedValue) -> Self {
        match value {
            TypedValue::Int(v) => OscType::Int(v),
            TypedValue::Float(v) => OscType::Float(v),
            TypedValue::String(v) => OscType::String(v),
            TypedValue::Bool(v) => OscType::Bool(v),
        }
    }
}

/// Converts `raw_text` into a value of the declared `kind`.
///
/// Deterministic and side-effect free.
///
/// # Errors
///
/// Returns [`ConversionError`] when the text does not follow the grammar for
/// `kind` (see the module docs).  `string` never fails.
///
/// # Examples
///
/// ```rust
/// use osc_core::{encode, ArgKind, TypedValue};
///
/// assert_eq!(encode(ArgKind::Int, "42"), Ok(TypedValue::Int(42)));
/// assert_eq!(encode(ArgKind::Bool, "true"), Ok(TypedValue::Bool(true)));
/// assert!(encode(ArgKind::Int, "forty-two").is_err());
/// ```
pub fn encode(kind: ArgKind, raw_text: &str) -> Result<TypedValue, ConversionError> {
    let fail = || ConversionError {
        field: kind.as_str(),
        input: raw_text.to_string(),
    };

    match kind {
        ArgKind::Int => raw_text.parse::<i32>().map(TypedValue::Int).map_err(|_| fail()),
        ArgKind::Float => {
            let value = raw_text.parse::<f32>().map_err(|_| fail())?;
            // `f32::from_str` saturates out-of-range input (e.g. "1e40") to
            // infinity; only an explicit infinity literal may produce one.
            if value.is_infinite() && !is_infinity_literal(raw_text) {
                return Err(fail());
            }
            Ok(TypedValue::Float(value))
        }
        ArgKind::String => Ok(TypedValue::String(raw_text.to_string())),
        ArgKind::Bool => parse_bool(raw_text).map(TypedValue::Bool).ok_or_else(fail),
    }
}

/// Accepted `bool` spellings.  Mixed casings such as `tRUE` are refused.
fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "true" | "True" | "TRUE" => Some(true),
        "0" | "f" | "F" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// One argument row of an outbound message: declared kind plus the text the
/// operator entered.
///
/// The text is not validated when it is stored; see [`OscArgument::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OscArgument {
    pub kind: ArgKind,
    pub raw_text: String,
    /// Optional human-readable label from configuration.
    pub description: Option<String>,
}

impl OscArgument {
    pub fn new(kind: ArgKind, raw_text: impl Into<String>) -> Self {
        Self {
            kind,
            raw_text: raw_text.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Converts this argument's text into a typed value.
    ///
    /// # Errors
    ///
    /// See [`encode`].
    pub fn encode(&self) -> Result<TypedValue, ConversionError> {
        encode(self.kind, &self.raw_text)
    }

    /// `type:value` as shown in send history, e.g. `int:42`.
    pub fn summary(&self) -> String {
        format!("{}:{}", self.kind, self.raw_text)
    }
}

impl Default for OscArgument {
    /// A freshly added argument row: `int` with text `"0"`.
    fn default() -> Self {
        Self::new(ArgKind::Int, "0")
    }
}

/// Encodes every argument in declaration order.
///
/// # Errors
///
/// Returns the [`ConversionError`] of the first argument that fails; the
/// remaining arguments are not visited.
pub fn encode_all(arguments: &[OscArgument]) -> Result<Vec<TypedValue>, ConversionError> {
    arguments.iter().map(OscArgument::encode).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
