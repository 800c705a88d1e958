//! Literal evaluation
//!
//! A literal node keeps its source text for display and evaluates its value
//! once, when the node is built, according to the lexical class the grammar
//! matched it as. Evaluation failures are reported, never replaced by a
//! default value.

use std::fmt;
use thiserror::Error;

/// Lexical class of a literal token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralClass {
    Number,
    String,
    Boolean,
}

/// Runtime value of a literal
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(n) => write!(f, "{}", n),
            LiteralValue::Float(x) => write!(f, "{:?}", x),
            LiteralValue::Str(s) => write!(f, "{}", s),
            LiteralValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Failure to turn literal text into its value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("invalid integer literal `{text}`")]
    InvalidInteger { text: String },

    #[error("invalid float literal `{text}`")]
    InvalidFloat { text: String },

    #[error("unknown escape sequence `\\{escape}` in string literal")]
    UnknownEscape { escape: char },

    #[error("string literal `{text}` is not closed")]
    Unterminated { text: String },

    #[error("invalid boolean literal `{text}`")]
    InvalidBoolean { text: String },
}

/// Evaluate literal `text` of the given class.
pub fn evaluate(class: LiteralClass, text: &str) -> Result<LiteralValue, LiteralError> {
    match class {
        LiteralClass::Number => evaluate_number(text),
        LiteralClass::String => unescape(text).map(LiteralValue::Str),
        LiteralClass::Boolean => match text {
            "true" => Ok(LiteralValue::Bool(true)),
            "false" => Ok(LiteralValue::Bool(false)),
            _ => Err(LiteralError::InvalidBoolean {
                text: text.to_string(),
            }),
        },
    }
}

fn evaluate_number(text: &str) -> Result<LiteralValue, LiteralError> {
    if text.contains(&['.', 'e', 'E'][..]) {
        text.parse::<f64>()
            .map(LiteralValue::Float)
            .map_err(|_| LiteralError::InvalidFloat {
                text: text.to_string(),
            })
    } else {
        text.parse::<i64>()
            .map(LiteralValue::Int)
            .map_err(|_| LiteralError::InvalidInteger {
                text: text.to_string(),
            })
    }
}

/// Strip the surrounding quotes and decode escape sequences.
fn unescape(text: &str) -> Result<String, LiteralError> {
    let inner = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| LiteralError::Unterminated {
            text: text.to_string(),
        })?;

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        let escaped = chars.next().ok_or_else(|| LiteralError::Unterminated {
            text: text.to_string(),
        })?;
        value.push(match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '\\' => '\\',
            '"' => '"',
            '0' => '\0',
            other => return Err(LiteralError::UnknownEscape { escape: other }),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(evaluate(LiteralClass::Number, "42"), Ok(LiteralValue::Int(42)));
        assert_eq!(evaluate(LiteralClass::Number, "-7"), Ok(LiteralValue::Int(-7)));
        assert_eq!(evaluate(LiteralClass::Number, "+3"), Ok(LiteralValue::Int(3)));
    }

    #[test]
    fn test_floats() {
        assert_eq!(evaluate(LiteralClass::Number, "2.5"), Ok(LiteralValue::Float(2.5)));
        assert_eq!(evaluate(LiteralClass::Number, "1e3"), Ok(LiteralValue::Float(1000.0)));
        assert_eq!(evaluate(LiteralClass::Number, "1."), Ok(LiteralValue::Float(1.0)));
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        let err = evaluate(LiteralClass::Number, "99999999999999999999").unwrap_err();
        assert!(matches!(err, LiteralError::InvalidInteger { .. }));
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            evaluate(LiteralClass::String, r#""hello\nworld""#),
            Ok(LiteralValue::Str("hello\nworld".to_string()))
        );
        assert_eq!(
            evaluate(LiteralClass::String, r#""say \"hi\"""#),
            Ok(LiteralValue::Str("say \"hi\"".to_string()))
        );
        assert_eq!(evaluate(LiteralClass::String, r#""""#), Ok(LiteralValue::Str(String::new())));
    }

    #[test]
    fn test_unknown_escape() {
        assert_eq!(
            evaluate(LiteralClass::String, r#""\q""#),
            Err(LiteralError::UnknownEscape { escape: 'q' })
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            evaluate(LiteralClass::String, "\""),
            Err(LiteralError::Unterminated { .. })
        ));
    }

    #[test]
    fn test_booleans() {
        assert_eq!(evaluate(LiteralClass::Boolean, "true"), Ok(LiteralValue::Bool(true)));
        assert_eq!(evaluate(LiteralClass::Boolean, "false"), Ok(LiteralValue::Bool(false)));
        assert!(evaluate(LiteralClass::Boolean, "yes").is_err());
    }
}
