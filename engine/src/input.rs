//! Leaves built from argv, and the bindings the matcher collects.

use std::fmt;

use docopt_core::Value;

/// One classified argv token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLeaf {
    /// A positional token (anything that is not an option, and everything
    /// after `--`).
    Positional(String),
    /// A resolved option with its canonical name and bound value: `true`
    /// for a flag, the supplied text for a value-taking option.
    Option { name: String, value: Value },
}

impl InputLeaf {
    pub fn option(name: impl Into<String>, value: Value) -> Self {
        InputLeaf::Option {
            name: name.into(),
            value,
        }
    }

    /// Canonical option name; positional tokens have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            InputLeaf::Positional(_) => None,
            InputLeaf::Option { name, .. } => Some(name),
        }
    }

    pub fn value(&self) -> Value {
        match self {
            InputLeaf::Positional(text) => Value::String(text.clone()),
            InputLeaf::Option { value, .. } => value.clone(),
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, InputLeaf::Positional(_))
    }
}

impl fmt::Display for InputLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputLeaf::Positional(text) => f.write_str(text),
            InputLeaf::Option {
                name,
                value: Value::String(v),
            } => write!(f, "{name}={v}"),
            InputLeaf::Option { name, .. } => f.write_str(name),
        }
    }
}

/// A name bound to a value during matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

impl Binding {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
