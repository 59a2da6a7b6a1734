//! Scalar parameter values as supplied by a parameter source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single flat parameter value.
///
/// Parameter sources (TOML files, environment variables, CLI overrides) only
/// ever produce scalars; nesting is introduced later by the assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// Parse a literal from a `KEY=VALUE` style override.
    ///
    /// `true`/`false` become booleans, integral text becomes an integer,
    /// finite decimal text becomes a float, everything else stays a string.
    /// Text wrapped in double quotes is always a string, quotes removed, so
    /// `"34"` can name an encoder.
    pub fn parse_literal(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(inner) = trimmed
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            return ParamValue::Str(inner.to_string());
        }
        match trimmed {
            "true" => return ParamValue::Bool(true),
            "false" => return ParamValue::Bool(false),
            _ => {}
        }
        if let Ok(int) = trimmed.parse::<i64>() {
            return ParamValue::Int(int);
        }
        if let Ok(float) = trimmed.parse::<f64>()
            && float.is_finite()
            && trimmed.chars().any(|c| c.is_ascii_digit())
        {
            return ParamValue::Float(float);
        }
        ParamValue::Str(raw.to_string())
    }

    /// Human-readable type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "a boolean",
            ParamValue::Int(_) => "an integer",
            ParamValue::Float(_) => "a float",
            ParamValue::Str(_) => "a string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to floats.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_bool() {
        assert_eq!(ParamValue::parse_literal("true"), ParamValue::Bool(true));
        assert_eq!(ParamValue::parse_literal("false"), ParamValue::Bool(false));
    }

    #[test]
    fn test_parse_literal_numbers() {
        assert_eq!(ParamValue::parse_literal("32"), ParamValue::Int(32));
        assert_eq!(ParamValue::parse_literal("-4"), ParamValue::Int(-4));
        assert_eq!(ParamValue::parse_literal("0.0001"), ParamValue::Float(0.0001));
    }

    #[test]
    fn test_parse_literal_falls_back_to_string() {
        assert_eq!(
            ParamValue::parse_literal("resize_and_pad"),
            ParamValue::Str("resize_and_pad".to_string())
        );
        // "inf" parses as f64 but is not a usable number
        assert_eq!(
            ParamValue::parse_literal("inf"),
            ParamValue::Str("inf".to_string())
        );
    }

    #[test]
    fn test_parse_literal_quoted_stays_string() {
        assert_eq!(
            ParamValue::parse_literal("\"34\""),
            ParamValue::Str("34".to_string())
        );
        assert_eq!(
            ParamValue::parse_literal(" \"true\" "),
            ParamValue::Str("true".to_string())
        );
        assert_eq!(ParamValue::parse_literal("\"\""), ParamValue::Str(String::new()));
        // A lone quote is not a quoted literal
        assert_eq!(
            ParamValue::parse_literal("\""),
            ParamValue::Str("\"".to_string())
        );
    }

    #[test]
    fn test_as_number_widens_int() {
        assert_eq!(ParamValue::Int(3).as_number(), Some(3.0));
        assert_eq!(ParamValue::Float(0.5).as_number(), Some(0.5));
        assert_eq!(ParamValue::Bool(true).as_number(), None);
    }

    #[test]
    fn test_deserialize_untagged_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            a: ParamValue,
            b: ParamValue,
            c: ParamValue,
            d: ParamValue,
        }

        let wrapper: Wrapper = toml::from_str(
            r#"
a = true
b = 8
c = 0.5
d = "edge"
"#,
        )
        .unwrap();
        assert_eq!(wrapper.a, ParamValue::Bool(true));
        assert_eq!(wrapper.b, ParamValue::Int(8));
        assert_eq!(wrapper.c, ParamValue::Float(0.5));
        assert_eq!(wrapper.d, ParamValue::Str("edge".to_string()));
    }
}
