//! Post-parse passes over a compiled grammar.
//!
//! [`canonicalize_identities`] makes structurally equal leaves share one arena
//! slot. [`reshape_repeated_leaves`] then looks at every way through the
//! grammar and, for leaves that can match more than once along a single path,
//! switches their value to a counter or a list so repeated matches accumulate
//! instead of overwriting each other.

use std::collections::HashMap;

use docopt_core::Value;
use tracing::debug;

use crate::pattern::{LeafId, LeafKind, Pattern, PatternTree};

/// Runs both passes, identities first.
pub fn fix(tree: &mut PatternTree) {
    canonicalize_identities(tree);
    reshape_repeated_leaves(tree);
}

/// Repoints every leaf position to the first leaf structurally equal to it.
///
/// Equality covers kind, name and current value.
pub fn canonicalize_identities(tree: &mut PatternTree) {
    let PatternTree { arena, root } = tree;
    let mut canonical: HashMap<_, LeafId> = HashMap::new();

    root.for_each_leaf_mut(&mut |id| {
        let first = *canonical.entry(arena.get(*id).clone()).or_insert(*id);
        *id = first;
    });
}

/// Promotes leaves that occur more than once within one alternative.
///
/// Commands and flags become `Integer(0)` counters. Arguments and
/// value-taking options become string lists; an existing string default is
/// split on whitespace to seed the list.
pub fn reshape_repeated_leaves(tree: &mut PatternTree) {
    for group in expand_alternatives(&tree.root) {
        let mut counts: HashMap<LeafId, usize> = HashMap::new();
        for id in &group {
            *counts.entry(*id).or_default() += 1;
        }

        for id in group {
            if counts.get(&id).copied().unwrap_or_default() < 2 {
                continue;
            }

            let leaf = tree.leaf_mut(id);
            let counted = match &leaf.kind {
                LeafKind::Command => true,
                LeafKind::Option { takes_value, .. } => !takes_value,
                LeafKind::Argument => false,
            };

            if counted {
                if !leaf.value.is_integer() {
                    debug!(leaf = %leaf.name, "repeated leaf becomes a counter");
                    leaf.value = Value::Integer(0);
                }
            } else if let Value::String(text) = &leaf.value {
                let list = text.split_whitespace().map(String::from).collect();
                debug!(leaf = %leaf.name, "repeated leaf becomes a list");
                leaf.value = Value::StringList(list);
            } else if !leaf.value.is_string_list() {
                debug!(leaf = %leaf.name, "repeated leaf becomes a list");
                leaf.value = Value::StringList(Vec::new());
            }
        }
    }
}

/// Flattens the tree into its alternatives, each a bag of leaf positions.
///
/// `Either` forks one alternative per child; a `OneOrMore` child is counted
/// twice; every other branch is inlined.
pub fn expand_alternatives(root: &Pattern) -> Vec<Vec<LeafId>> {
    let mut result = Vec::new();
    let mut groups: Vec<Vec<&Pattern>> = vec![vec![root]];

    while let Some(mut children) = groups.pop() {
        let Some(pos) = children.iter().position(|c| c.is_branch()) else {
            result.push(
                children
                    .iter()
                    .filter_map(|c| match c {
                        Pattern::Leaf(id) => Some(*id),
                        _ => None,
                    })
                    .collect(),
            );
            continue;
        };

        let branch = children.remove(pos);
        match branch {
            Pattern::Either(alternatives) => {
                for alternative in alternatives {
                    let mut group = vec![alternative];
                    group.extend(children.iter().copied());
                    groups.push(group);
                }
            }
            Pattern::OneOrMore(child) => {
                let mut group = vec![&**child, &**child];
                group.extend(children);
                groups.push(group);
            }
            _ => {
                let mut group: Vec<&Pattern> = branch.children().iter().collect();
                group.extend(children);
                groups.push(group);
            }
        }
    }

    result
}
