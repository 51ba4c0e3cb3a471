//! The pattern tree compiled from usage text.
//!
//! Leaves bind to input tokens; branches combine child patterns. Leaves live
//! in a [`LeafArena`] and the tree refers to them by [`LeafId`], so several
//! tree positions can share one leaf: after identity canonicalization every
//! occurrence of, say, `-v` in the grammar is the same arena slot, and the
//! value kind assigned to it by repetition analysis is seen from all of them.
//!
//! Branches hold no mutable state and are plain owned values.

use std::collections::HashSet;

use docopt_core::Value;

use crate::options::OptionSpec;

/// Stable index of a leaf inside a [`LeafArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId(usize);

impl LeafId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Variant of a leaf pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// Positional placeholder such as `<name>` or `FILE`.
    Argument,
    /// Literal word that must appear verbatim, such as `ship`.
    Command,
    /// Short and/or long option.
    Option {
        short: Option<String>,
        long: Option<String>,
        takes_value: bool,
    },
}

/// A leaf pattern: its variant, canonical name and current value.
///
/// Equality and hashing cover all three, which is the structural identity
/// canonicalization dedups on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Leaf {
    pub kind: LeafKind,
    pub name: String,
    pub value: Value,
}

impl Leaf {
    pub fn argument(name: impl Into<String>) -> Self {
        Self {
            kind: LeafKind::Argument,
            name: name.into(),
            value: Value::Empty,
        }
    }

    pub fn command(name: impl Into<String>) -> Self {
        Self {
            kind: LeafKind::Command,
            name: name.into(),
            value: Value::Bool(false),
        }
    }

    pub fn option(spec: &OptionSpec) -> Self {
        Self {
            kind: LeafKind::Option {
                short: spec.short.clone(),
                long: spec.long.clone(),
                takes_value: spec.takes_value,
            },
            name: spec.name().to_string(),
            value: spec.value.clone(),
        }
    }

    pub fn is_option(&self) -> bool {
        matches!(self.kind, LeafKind::Option { .. })
    }

    /// Whether this leaf denotes the same option as `spec`, default included.
    pub fn is_same_option(&self, spec: &OptionSpec) -> bool {
        match &self.kind {
            LeafKind::Option {
                short,
                long,
                takes_value,
            } => {
                *short == spec.short
                    && *long == spec.long
                    && *takes_value == spec.takes_value
                    && self.value == spec.value
            }
            _ => false,
        }
    }
}

/// Storage for every leaf created while compiling one grammar.
#[derive(Debug, Clone, Default)]
pub struct LeafArena {
    leaves: Vec<Leaf>,
}

impl LeafArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, leaf: Leaf) -> LeafId {
        self.leaves.push(leaf);
        LeafId(self.leaves.len() - 1)
    }

    /// Allocates a fresh leaf and wraps it as a pattern.
    pub fn leaf(&mut self, leaf: Leaf) -> Pattern {
        Pattern::Leaf(self.alloc(leaf))
    }

    pub fn get(&self, id: LeafId) -> &Leaf {
        &self.leaves[id.0]
    }

    pub fn get_mut(&mut self, id: LeafId) -> &mut Leaf {
        &mut self.leaves[id.0]
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

/// A node of the grammar tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    Leaf(LeafId),
    /// All children must match, atomically.
    Required(Vec<Pattern>),
    /// Each child is attempted; never fails.
    Optional(Vec<Pattern>),
    /// `[options]`: an optional group filled with otherwise unreferenced options.
    OptionsShortcut(Vec<Pattern>),
    /// The child, repeated one or more times.
    OneOrMore(Box<Pattern>),
    /// Exactly one alternative; the one consuming the most input wins.
    Either(Vec<Pattern>),
}

impl Pattern {
    pub fn is_branch(&self) -> bool {
        !matches!(self, Pattern::Leaf(_))
    }

    pub fn children(&self) -> &[Pattern] {
        match self {
            Pattern::Leaf(_) => &[],
            Pattern::Required(children)
            | Pattern::Optional(children)
            | Pattern::OptionsShortcut(children)
            | Pattern::Either(children) => children,
            Pattern::OneOrMore(child) => std::slice::from_ref(&**child),
        }
    }

    /// Self and descendants in depth-first order, keeping those accepted by
    /// `filter`. Descent stops at any node the filter accepts.
    pub fn flat<'a>(&'a self, filter: &dyn Fn(&Pattern) -> bool) -> Vec<&'a Pattern> {
        let mut out = Vec::new();
        self.flat_into(filter, &mut out);
        out
    }

    fn flat_into<'a>(&'a self, filter: &dyn Fn(&Pattern) -> bool, out: &mut Vec<&'a Pattern>) {
        if filter(self) {
            out.push(self);
            return;
        }
        for child in self.children() {
            child.flat_into(filter, out);
        }
    }

    /// Every leaf id below this node, depth-first, duplicates included.
    pub fn collect_leaves(&self, out: &mut Vec<LeafId>) {
        match self {
            Pattern::Leaf(id) => out.push(*id),
            _ => {
                for child in self.children() {
                    child.collect_leaves(out);
                }
            }
        }
    }

    pub fn leaves(&self) -> Vec<LeafId> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    /// Visits every leaf position below this node, letting `f` repoint it.
    pub fn for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut LeafId)) {
        match self {
            Pattern::Leaf(id) => f(id),
            Pattern::Required(children)
            | Pattern::Optional(children)
            | Pattern::OptionsShortcut(children)
            | Pattern::Either(children) => {
                for child in children {
                    child.for_each_leaf_mut(f);
                }
            }
            Pattern::OneOrMore(child) => child.for_each_leaf_mut(f),
        }
    }

    fn for_each_shortcut_mut(&mut self, f: &mut dyn FnMut(&mut Vec<Pattern>)) {
        match self {
            Pattern::Leaf(_) => {}
            Pattern::OptionsShortcut(children) => f(children),
            Pattern::Required(children) | Pattern::Optional(children) | Pattern::Either(children) => {
                for child in children {
                    child.for_each_shortcut_mut(f);
                }
            }
            Pattern::OneOrMore(child) => child.for_each_shortcut_mut(f),
        }
    }
}

/// A compiled grammar: the root pattern plus the leaves it refers to.
#[derive(Debug, Clone)]
pub struct PatternTree {
    pub arena: LeafArena,
    pub root: Pattern,
}

impl PatternTree {
    pub fn new(arena: LeafArena, root: Pattern) -> Self {
        Self { arena, root }
    }

    pub fn leaf(&self, id: LeafId) -> &Leaf {
        self.arena.get(id)
    }

    pub fn leaf_mut(&mut self, id: LeafId) -> &mut Leaf {
        self.arena.get_mut(id)
    }

    /// Every leaf position in the tree, depth-first.
    pub fn leaves(&self) -> Vec<LeafId> {
        self.root.leaves()
    }

    /// Distinct leaf ids reachable from the root, in first-seen order.
    pub fn unique_leaves(&self) -> Vec<LeafId> {
        let mut seen = HashSet::new();
        self.leaves().into_iter().filter(|id| seen.insert(*id)).collect()
    }

    /// Option leaves reachable from the root.
    pub fn option_leaves(&self) -> Vec<&Leaf> {
        self.leaves()
            .into_iter()
            .map(|id| self.arena.get(id))
            .filter(|leaf| leaf.is_option())
            .collect()
    }

    pub fn options_shortcut_count(&self) -> usize {
        self.root
            .flat(&|p| matches!(p, Pattern::OptionsShortcut(_)))
            .len()
    }

    /// Replaces the children of every `[options]` shortcut with fresh leaves
    /// for `options`.
    pub fn fill_options_shortcuts(&mut self, options: &[OptionSpec]) {
        let Self { arena, root } = self;
        root.for_each_shortcut_mut(&mut |children| {
            *children = options.iter().map(|spec| arena.leaf(Leaf::option(spec))).collect();
        });
    }
}
