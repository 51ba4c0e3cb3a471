//! Matching input leaves against a compiled grammar.
//!
//! Every combinator works on its own copies of `left` (the input leaves not
//! yet consumed) and `collected` (the bindings made so far) and writes them
//! back only on success, so a failed or discarded attempt never leaves a
//! trace. Aggregation follows the value kind each grammar leaf was given by
//! repetition analysis: counters are incremented, lists are appended to, and
//! anything else is overwritten.

use docopt_core::Value;

use crate::input::{Binding, InputLeaf};
use crate::pattern::{Leaf, LeafArena, LeafKind, Pattern};

/// Matches patterns whose leaves live in `arena`.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    arena: &'a LeafArena,
}

impl<'a> Matcher<'a> {
    pub fn new(arena: &'a LeafArena) -> Self {
        Self { arena }
    }

    /// Tries `pattern` against `left`.
    ///
    /// On success the consumed leaves are removed from `left`, the resulting
    /// bindings are merged into `collected` and `true` is returned. On
    /// failure both are left untouched.
    pub fn match_pattern(
        &self,
        pattern: &Pattern,
        left: &mut Vec<InputLeaf>,
        collected: &mut Vec<Binding>,
    ) -> bool {
        match pattern {
            Pattern::Leaf(id) => self.match_leaf(self.arena.get(*id), left, collected),
            Pattern::Required(children) => {
                let mut l = left.clone();
                let mut c = collected.clone();
                for child in children {
                    if !self.match_pattern(child, &mut l, &mut c) {
                        return false;
                    }
                }
                *left = l;
                *collected = c;
                true
            }
            Pattern::Optional(children) | Pattern::OptionsShortcut(children) => {
                for child in children {
                    self.match_pattern(child, left, collected);
                }
                true
            }
            Pattern::OneOrMore(child) => self.match_repeated(child, left, collected),
            Pattern::Either(alternatives) => self.match_either(alternatives, left, collected),
        }
    }

    fn match_repeated(
        &self,
        child: &Pattern,
        left: &mut Vec<InputLeaf>,
        collected: &mut Vec<Binding>,
    ) -> bool {
        let mut l = left.clone();
        let mut c = collected.clone();
        let mut previous: Option<Vec<InputLeaf>> = None;
        let mut times = 0;

        while self.match_pattern(child, &mut l, &mut c) {
            times += 1;
            // Stop once an iteration consumes nothing.
            if previous.as_ref() == Some(&l) {
                break;
            }
            previous = Some(l.clone());
        }

        if times == 0 {
            return false;
        }
        *left = l;
        *collected = c;
        true
    }

    /// Keeps the successful alternative leaving the fewest leaves; the
    /// earliest one wins a tie.
    fn match_either(
        &self,
        alternatives: &[Pattern],
        left: &mut Vec<InputLeaf>,
        collected: &mut Vec<Binding>,
    ) -> bool {
        let mut best: Option<(Vec<InputLeaf>, Vec<Binding>)> = None;

        for alternative in alternatives {
            let mut l = left.clone();
            let mut c = collected.clone();
            if !self.match_pattern(alternative, &mut l, &mut c) {
                continue;
            }
            let better = best
                .as_ref()
                .is_none_or(|(best_left, _)| l.len() < best_left.len());
            if better {
                best = Some((l, c));
            }
        }

        match best {
            Some((l, c)) => {
                *left = l;
                *collected = c;
                true
            }
            None => false,
        }
    }

    fn match_leaf(&self, leaf: &Leaf, left: &mut Vec<InputLeaf>, collected: &mut Vec<Binding>) -> bool {
        let Some((pos, value)) = single_match(leaf, left) else {
            return false;
        };
        left.remove(pos);

        let existing = collected.iter_mut().find(|b| b.name == leaf.name);
        match &leaf.value {
            Value::Integer(_) => match existing {
                Some(binding) => {
                    binding.value = match binding.value {
                        Value::Integer(n) => Value::Integer(n + 1),
                        _ => Value::Integer(1),
                    };
                }
                None => collected.push(Binding::new(leaf.name.as_str(), Value::Integer(1))),
            },
            Value::StringList(_) => {
                let increment = match value {
                    Value::String(s) => vec![s],
                    Value::StringList(list) => list,
                    _ => Vec::new(),
                };
                match existing {
                    Some(binding) => match &mut binding.value {
                        Value::StringList(list) => list.extend(increment),
                        other => *other = Value::StringList(increment),
                    },
                    None => collected.push(Binding::new(
                        leaf.name.as_str(),
                        Value::StringList(increment),
                    )),
                }
            }
            _ => match existing {
                Some(binding) => binding.value = value,
                None => collected.push(Binding::new(leaf.name.as_str(), value)),
            },
        }
        true
    }
}

/// Finds the input leaf `leaf` would consume and the value it binds.
fn single_match(leaf: &Leaf, left: &[InputLeaf]) -> Option<(usize, Value)> {
    match &leaf.kind {
        LeafKind::Argument => left.iter().enumerate().find_map(|(pos, input)| match input {
            InputLeaf::Positional(text) => Some((pos, Value::String(text.clone()))),
            InputLeaf::Option { .. } => None,
        }),
        // Only the first positional is considered: a command never skips
        // over other positionals to find its word.
        LeafKind::Command => {
            let (pos, text) = left.iter().enumerate().find_map(|(pos, input)| match input {
                InputLeaf::Positional(text) => Some((pos, text)),
                InputLeaf::Option { .. } => None,
            })?;
            (*text == leaf.name).then_some((pos, Value::Bool(true)))
        }
        LeafKind::Option { .. } => left.iter().enumerate().find_map(|(pos, input)| match input {
            InputLeaf::Option { name, value } if *name == leaf.name => Some((pos, value.clone())),
            _ => None,
        }),
    }
}
