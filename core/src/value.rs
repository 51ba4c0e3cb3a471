//! The value type produced for every name in a usage grammar.
//!
//! A [`Value`] is a closed tagged union. Which variant a name ends up with is
//! decided by the grammar, not by the user's input:
//!
//! - commands and flags that appear once → [`Value::Bool`]
//! - commands and flags that may repeat → [`Value::Integer`] (a counter)
//! - options taking a value and positional arguments → [`Value::String`]
//! - repeatable arguments and options → [`Value::StringList`]
//! - optional values that were never supplied → [`Value::Empty`]
//!
//! Equality and hashing are structural and kind-sensitive, so `Bool(true)`
//! never equals `Integer(1)` and `String("1")` never equals `Integer(1)`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Discriminant of a [`Value`], used in accessor errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Empty,
    Bool,
    Integer,
    String,
    StringList,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueKind::Empty => "empty",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::String => "string",
            ValueKind::StringList => "string-list",
        };
        f.write_str(label)
    }
}

/// Errors returned by the kind-checked accessors on [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The accessor asked for a kind the value does not hold.
    #[error("illegal cast to {expected}; value is actually {actual}")]
    KindMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },
    /// A string value could not be read as a base-10 integer.
    #[error("'{0}' contains non-numeric characters")]
    NotNumeric(String),
}

/// A value bound to a name after matching.
///
/// # Examples
///
/// ```
/// use docopt_core::Value;
///
/// let speed = Value::from("10");
/// assert_eq!(speed.as_integer().unwrap(), 10);
/// assert!(speed.as_bool().is_err());
///
/// let names = Value::from(vec!["Titanic".to_string()]);
/// assert_eq!(names.to_string(), r#"["Titanic"]"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of a value (rendered as `null`).
    #[default]
    Empty,
    Bool(bool),
    Integer(i64),
    String(String),
    /// Insertion-ordered list of strings.
    StringList(Vec<String>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Empty => ValueKind::Empty,
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            Value::StringList(_) => ValueKind::StringList,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_string_list(&self) -> bool {
        matches!(self, Value::StringList(_))
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch(ValueKind::Bool)),
        }
    }

    /// Returns the integer payload.
    ///
    /// A `String` value is accepted too and parsed as a base-10 integer;
    /// leading whitespace is skipped, but any trailing non-digit fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use docopt_core::{Value, ValueError};
    ///
    /// assert_eq!(Value::Integer(3).as_integer(), Ok(3));
    /// assert_eq!(Value::from(" -7").as_integer(), Ok(-7));
    /// assert!(matches!(Value::from("7kn").as_integer(), Err(ValueError::NotNumeric(_))));
    /// ```
    pub fn as_integer(&self) -> Result<i64, ValueError> {
        match self {
            Value::Integer(n) => Ok(*n),
            Value::String(s) => s
                .trim_start()
                .parse::<i64>()
                .map_err(|_| ValueError::NotNumeric(s.clone())),
            other => Err(other.mismatch(ValueKind::Integer)),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch(ValueKind::String)),
        }
    }

    pub fn as_string_list(&self) -> Result<&[String], ValueError> {
        match self {
            Value::StringList(list) => Ok(list),
            other => Err(other.mismatch(ValueKind::StringList)),
        }
    }

    fn mismatch(&self, expected: ValueKind) -> ValueError {
        ValueError::KindMismatch {
            expected,
            actual: self.kind(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(list: Vec<String>) -> Self {
        Value::StringList(list)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "\"{s}\""),
            Value::StringList(list) => {
                f.write_str("[")?;
                for (idx, item) in list.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{item}\"")?;
                }
                f.write_str("]")
            }
        }
    }
}
