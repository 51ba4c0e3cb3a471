//! Option records and the registry shared by both parse passes.
//!
//! Options are declared in `options:` sections, one description per entry:
//!
//! ```text
//! Options:
//!   -h --help         Show this screen.
//!   -o FILE, --output=FILE
//!                     Write here [default: out.txt].
//! ```
//!
//! The text before the first double space names the option (short and/or
//! long spelling, plus an optional placeholder meaning it takes a value); the
//! rest is free description, scanned only for a `[default: VALUE]` marker.
//!
//! The resulting [`OptionRegistry`] is then threaded through usage-pattern
//! parsing (which appends options first seen in the patterns) and argv
//! parsing (which appends unknown options the user typed).

use std::sync::LazyLock;

use docopt_core::Value;
use regex::Regex;

use crate::lexer::{SectionLabel, parse_section};

static DEFAULT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[default: ([^\n]*)\]").expect("static regex must compile")
});

/// A declared option: its spellings, arity and default value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionSpec {
    /// Short form (e.g. `-o`).
    pub short: Option<String>,
    /// Long form (e.g. `--output`).
    pub long: Option<String>,
    /// Whether the option consumes a value (arity 1) or not (arity 0).
    pub takes_value: bool,
    /// Default value bound when the option is absent from argv.
    pub value: Value,
}

impl OptionSpec {
    /// Creates an option record.
    ///
    /// A value-taking option whose default is `Bool(false)` gets
    /// [`Value::Empty`] instead: "no default" for a value means absent, not
    /// false.
    pub fn new(short: Option<&str>, long: Option<&str>, takes_value: bool, value: Value) -> Self {
        let value = if takes_value && value == Value::Bool(false) {
            Value::Empty
        } else {
            value
        };
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            takes_value,
            value,
        }
    }

    /// A flag (arity 0) defaulting to `false`.
    pub fn flag(short: Option<&str>, long: Option<&str>) -> Self {
        Self::new(short, long, false, Value::Bool(false))
    }

    /// Canonical name: the long spelling if present, else the short one.
    pub fn name(&self) -> &str {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .unwrap_or_default()
    }
}

/// Ordered collection of known options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionRegistry {
    options: Vec<OptionSpec>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, option: OptionSpec) {
        self.options.push(option);
    }

    /// Options whose long spelling is exactly `long`.
    pub fn find_long(&self, long: &str) -> Vec<&OptionSpec> {
        self.options
            .iter()
            .filter(|o| o.long.as_deref() == Some(long))
            .collect()
    }

    /// Options whose short spelling is exactly `short`.
    pub fn find_short(&self, short: &str) -> Vec<&OptionSpec> {
        self.options
            .iter()
            .filter(|o| o.short.as_deref() == Some(short))
            .collect()
    }

    /// Options with a long spelling that starts with `prefix`.
    pub fn long_prefix_matches(&self, prefix: &str) -> Vec<&OptionSpec> {
        self.options
            .iter()
            .filter(|o| o.long.as_deref().is_some_and(|l| l.starts_with(prefix)))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionSpec> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl<'a> IntoIterator for &'a OptionRegistry {
    type Item = &'a OptionSpec;
    type IntoIter = std::slice::Iter<'a, OptionSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

/// Parses one option description entry.
///
/// # Examples
///
/// ```
/// use docopt_core::Value;
/// use docopt_engine::parse_option_description;
///
/// let opt = parse_option_description("--speed=<kn>  Speed in knots [default: 10].");
/// assert_eq!(opt.long.as_deref(), Some("--speed"));
/// assert!(opt.takes_value);
/// assert_eq!(opt.value, Value::from("10"));
///
/// let flag = parse_option_description("-h --help  Show this screen.");
/// assert_eq!(flag.name(), "--help");
/// assert_eq!(flag.value, Value::Bool(false));
/// ```
pub fn parse_option_description(description: &str) -> OptionSpec {
    let (spec, text) = match description.find("  ") {
        Some(idx) => description.split_at(idx),
        None => (description, ""),
    };

    let mut short = None;
    let mut long = None;
    let mut takes_value = false;

    for word in spec
        .split(|c: char| c == ',' || c == '=' || c.is_whitespace())
        .filter(|w| !w.is_empty())
    {
        if word.starts_with("--") {
            long = Some(word);
        } else if word.starts_with('-') {
            short = Some(word);
        } else {
            takes_value = true;
        }
    }

    let mut value = Value::Bool(false);
    if takes_value {
        if let Some(default) = DEFAULT_VALUE.captures(text).and_then(|caps| caps.get(1)) {
            value = Value::from(default.as_str());
        }
    }

    OptionSpec::new(short, long, takes_value, value)
}

/// Collects the options described in every `options:` section of `doc`.
///
/// Each entry starts at a line whose first non-blank character is `-`;
/// following lines that don't start a new entry belong to the previous one,
/// so a `[default: ...]` on a wrapped description line is still found.
pub fn parse_defaults(doc: &str) -> OptionRegistry {
    let mut registry = OptionRegistry::new();

    for section in parse_section(SectionLabel::Options, doc) {
        let body = section.find(':').map_or(section.as_str(), |idx| &section[idx + 1..]);

        let mut entries: Vec<String> = Vec::new();
        for line in body.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with('-') {
                entries.push(trimmed.to_string());
            } else if let Some(entry) = entries.last_mut() {
                entry.push('\n');
                entry.push_str(line);
            }
        }

        for entry in &entries {
            registry.register(parse_option_description(entry));
        }
    }

    registry
}
