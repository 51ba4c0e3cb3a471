//! The name → value map returned by a successful match.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::Value;

/// Result of matching argv against a usage grammar.
///
/// Every name declared anywhere in the grammar is present: names the user
/// never supplied carry their declared default. Keys are canonical leaf
/// names such as `--speed`, `-v`, `<name>`, `FILE` or `ship`.
///
/// # Examples
///
/// ```
/// use docopt_core::{ArgMap, Value};
///
/// let mut args = ArgMap::new();
/// args.insert("ship", Value::Bool(true));
/// args.insert("-v", Value::Integer(2));
/// args.insert("<name>", Value::from(vec!["Titanic".to_string()]));
///
/// assert!(args.get_bool("ship"));
/// assert_eq!(args.get_count("-v"), 2);
/// assert_eq!(args.get_list("<name>"), ["Titanic"]);
/// assert_eq!(args.get_str("--speed"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgMap {
    values: BTreeMap<String, Value>,
}

impl ArgMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value bound to `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.values.iter()
    }

    /// `true` for `Bool(true)` or a positive counter; `false` otherwise,
    /// including for unknown names.
    pub fn get_bool(&self, name: &str) -> bool {
        match self.values.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Integer(n)) => *n > 0,
            _ => false,
        }
    }

    /// Occurrence count: the counter itself, or 1/0 for a flag that can
    /// only appear once.
    pub fn get_count(&self, name: &str) -> i64 {
        match self.values.get(name) {
            Some(Value::Integer(n)) => *n,
            Some(Value::Bool(true)) => 1,
            _ => 0,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_list(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(Value::StringList(list)) => list,
            _ => &[],
        }
    }
}

impl FromIterator<(String, Value)> for ArgMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ArgMap {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a ArgMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters_ignore_other_kinds() {
        let args: ArgMap = [
            ("--speed".to_string(), Value::from("10")),
            ("--drifting".to_string(), Value::Bool(false)),
            ("-v".to_string(), Value::Integer(0)),
            ("<x>".to_string(), Value::Empty),
        ]
        .into_iter()
        .collect();

        assert_eq!(args.get_str("--speed"), Some("10"));
        assert!(!args.get_bool("--speed"));
        assert!(!args.get_bool("--drifting"));
        assert!(!args.get_bool("-v"));
        assert_eq!(args.get_count("--drifting"), 0);
        assert!(args.get_list("<x>").is_empty());
        assert!(args.contains("<x>"));
        assert!(!args.contains("<y>"));
    }

    #[test]
    fn test_serializes_as_sorted_object() {
        let mut args = ArgMap::new();
        args.insert("ship", Value::Bool(true));
        args.insert("<name>", Value::from(vec!["Titanic".to_string()]));
        args.insert("--speed", Value::from("10"));

        let json = serde_json::to_string(&args).unwrap();
        assert_eq!(
            json,
            r#"{"--speed":"10","<name>":["Titanic"],"ship":true}"#
        );
    }
}
