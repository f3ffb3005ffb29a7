//! Built-in field parsers and the custom parser signature.
//!
//! The built-in set is fixed: `boolean`, `integer`, `decimal`, `string`
//! and `raw`. Anything else a column needs is expressed as a custom
//! parser closure, either registered under a name on the definition or
//! attached directly to the column.

use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::error::BoxedError;
use crate::row::RowContext;
use crate::value::Value;

/// Signature of a custom field parser.
///
/// Receives the raw field text (empty when the field is absent from a
/// short row) and the row context, and returns the parsed [`Value`] or
/// an error that fails the whole import.
pub type CustomParser =
    dyn Fn(&str, &RowContext<'_>) -> std::result::Result<Value, BoxedError> + Send + Sync;

/// The fixed set of built-in parsers a column can be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinParser {
    Boolean,
    Integer,
    Decimal,
    String,
    Raw,
}

impl BuiltinParser {
    /// Names accepted when a column is declared, in documentation order
    pub const NAMES: [&'static str; 5] = ["boolean", "integer", "decimal", "string", "raw"];

    /// Looks a built-in parser up by its declaration name
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "decimal" => Some(Self::Decimal),
            "string" => Some(Self::String),
            "raw" => Some(Self::Raw),
            _ => None,
        }
    }

    /// The declaration name of this parser
    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Raw => "raw",
        }
    }

    /// Applies this parser to a raw field.
    ///
    /// Only the decimal parser can fail; `None` means the field had no
    /// parseable digits left after stripping currency noise.
    pub(crate) fn parse(self, raw: &str) -> Option<Value> {
        match self {
            Self::Boolean => Some(Value::Bool(parse_boolean(raw))),
            Self::Integer => Some(Value::Integer(parse_integer(raw))),
            Self::Decimal => parse_decimal(raw).map(Value::Decimal),
            Self::String => Some(Value::String(parse_string(raw))),
            Self::Raw => Some(Value::String(raw.to_string())),
        }
    }
}

/// Recognizes `1`, `t` and `true`, case-insensitively and ignoring
/// surrounding whitespace. Everything else, including empty fields,
/// is `false`.
pub fn parse_boolean(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "t" | "true")
}

/// Reads a leading integer prefix: optional sign, then digits, stopping
/// at the first non-digit. Fields with no leading digits parse to 0, so
/// `"12 units"` is 12 and `"abc"` is 0. Values outside the `i64` range
/// saturate.
pub fn parse_integer(raw: &str) -> i64 {
    let mut rest = raw.trim_start();
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let mut value: i64 = 0;
    for digit in rest[..end].bytes() {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }
    if negative { -value } else { value }
}

/// Strips everything except digits and decimal points, then parses what
/// is left as an arbitrary-precision decimal. This handles currency
/// symbols and grouping separators (`"$1,234.56"` is 1234.56) but also
/// drops minus signs, so negative inputs come out positive. `None` when
/// nothing parseable remains.
pub fn parse_decimal(raw: &str) -> Option<BigDecimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    BigDecimal::from_str(&cleaned).ok()
}

/// Trims surrounding whitespace
pub fn parse_string(raw: &str) -> String {
    raw.trim().to_string()
}
