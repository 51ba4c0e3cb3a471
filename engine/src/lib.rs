//! Compile docopt-style usage text into a grammar and match argv against it.
//!
//! A usage document is the program's own help text. Its `usage:` section
//! holds one pattern per line; its `options:` sections describe options and
//! their defaults. This crate turns that text into a pattern tree, classifies
//! an argument vector against the declared options, and matches one against
//! the other to produce an [`ArgMap`] naming every argument, command and
//! option the grammar declares.
//!
//! # Main entry points
//!
//! - [`parse`] / [`parse_with_config`]: one-shot compile and match.
//! - [`Docopt`]: a handle that validates the document once and can then
//!   match any number of argument vectors.
//! - [`build_pattern_tree`]: compile only, for inspecting the grammar.
//!
//! # Example
//!
//! ```
//! use docopt_core::Value;
//! use docopt_engine::{Outcome, parse};
//!
//! let doc = "\
//! Naval Fate.
//!
//! Usage:
//!   naval_fate ship new <name>...
//!   naval_fate ship <name> move <x> <y> [--speed=<kn>]
//!
//! Options:
//!   --speed=<kn>  Speed in knots [default: 10].
//! ";
//!
//! let outcome = parse(doc, ["ship", "Guardian", "move", "10", "50"], true, false, false).unwrap();
//! let Outcome::Matched(args) = outcome else { panic!("expected a match") };
//! assert_eq!(args.get_str("<name>"), None);
//! assert_eq!(args.get_list("<name>"), ["Guardian"]);
//! assert!(args.get_bool("move"));
//! assert_eq!(args.get("--speed"), Some(&Value::from("10")));
//! ```
//!
//! Help and version requests are not errors: they come back as
//! [`Outcome::HelpRequested`] and [`Outcome::VersionRequested`], and the caller
//! decides what to print.

pub mod config;
pub mod error;
pub mod fixups;
pub mod input;
pub mod lexer;
pub mod matcher;
pub mod options;
pub mod parser;
pub mod pattern;
pub mod tokens;

use docopt_core::ArgMap;
use tracing::debug;

pub use config::ParseConfig;
pub use error::{ConfigError, DocoptError, OptionError, Result};
pub use options::{OptionRegistry, OptionSpec, parse_option_description};
pub use pattern::PatternTree;

use crate::input::InputLeaf;
use crate::lexer::{SectionLabel, formal_usage, parse_section};
use crate::matcher::Matcher;
use crate::options::parse_defaults;
use crate::parser::{parse_argv, parse_pattern};
use crate::pattern::LeafArena;
use crate::tokens::Tokens;

/// Result of a successful parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The argv matched; every name the grammar declares is present.
    Matched(ArgMap),
    /// `-h` or `--help` was given and help handling is enabled.
    HelpRequested,
    /// `--version` was given and version handling is enabled.
    VersionRequested,
}

impl Outcome {
    /// The argument map, if argv matched.
    pub fn into_args(self) -> Option<ArgMap> {
        match self {
            Outcome::Matched(args) => Some(args),
            Outcome::HelpRequested | Outcome::VersionRequested => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Outcome::Matched(_))
    }
}

/// Returns the single `usage:` section of `doc`.
pub fn usage_section(doc: &str) -> Result<String> {
    let mut sections = parse_section(SectionLabel::Usage, doc);
    match sections.len() {
        0 => Err(DocoptError::Grammar(
            "'usage:' (case-insensitive) not found.".to_string(),
        )),
        1 => Ok(sections.remove(0)),
        _ => Err(DocoptError::Grammar(
            "More than one 'usage:' (case-insensitive).".to_string(),
        )),
    }
}

/// Compiles `doc` into a fixed-up pattern tree and the option registry.
///
/// `[options]` shortcuts are filled with every declared option the patterns
/// don't already mention.
pub fn build_pattern_tree(doc: &str) -> Result<(PatternTree, OptionRegistry)> {
    let usage = usage_section(doc)?;
    let mut registry = parse_defaults(doc);
    let mut arena = LeafArena::new();
    let root = parse_pattern(&formal_usage(&usage), &mut registry, &mut arena)?;
    let mut tree = PatternTree::new(arena, root);

    let shortcuts = tree.options_shortcut_count();
    if shortcuts > 0 {
        let referenced = tree.option_leaves();
        let mut unreferenced: Vec<OptionSpec> = Vec::new();
        for spec in &registry {
            if referenced.iter().any(|leaf| leaf.is_same_option(spec)) || unreferenced.contains(spec) {
                continue;
            }
            unreferenced.push(spec.clone());
        }
        tree.fill_options_shortcuts(&unreferenced);
    }

    fixups::fix(&mut tree);

    debug!(
        leaves = tree.unique_leaves().len(),
        options = registry.len(),
        shortcuts,
        "built pattern tree"
    );
    Ok((tree, registry))
}

/// Compiles `doc` and matches `argv` against it.
///
/// With `help` set, a `-h`/`--help` option in argv short-circuits to
/// [`Outcome::HelpRequested`]; `version` does the same for `--version`.
/// With `options_first`, option recognition stops at the first positional.
pub fn parse<I, S>(doc: &str, argv: I, help: bool, version: bool, options_first: bool) -> Result<Outcome>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let (tree, mut registry) = build_pattern_tree(doc)?;
    let input = parse_argv(Tokens::from_argv(argv), &mut registry, options_first)?;
    debug!(leaves = input.len(), "tokenized argv");

    if help && has_option(&input, &["-h", "--help"]) {
        return Ok(Outcome::HelpRequested);
    }
    if version && has_option(&input, &["--version"]) {
        return Ok(Outcome::VersionRequested);
    }

    let mut left = input;
    let mut collected = Vec::new();
    let matched = Matcher::new(&tree.arena).match_pattern(&tree.root, &mut left, &mut collected);
    debug!(matched, leftover = left.len(), "matched argv against usage");

    if !matched {
        return Err(DocoptError::Argument(
            "Arguments did not match expected patterns".to_string(),
        ));
    }
    if !left.is_empty() {
        let leftover = left
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(DocoptError::Argument(format!(
            "Unexpected argument: {leftover}"
        )));
    }

    let mut args = ArgMap::new();
    for id in tree.leaves() {
        let leaf = tree.leaf(id);
        args.insert(leaf.name.as_str(), leaf.value.clone());
    }
    for binding in collected {
        args.insert(binding.name, binding.value);
    }
    Ok(Outcome::Matched(args))
}

/// [`parse`] with its flags taken from a [`ParseConfig`].
pub fn parse_with_config<I, S>(doc: &str, argv: I, config: &ParseConfig) -> Result<Outcome>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parse(doc, argv, config.help, config.version, config.options_first)
}

fn has_option(input: &[InputLeaf], names: &[&str]) -> bool {
    input.iter().any(|leaf| match leaf {
        InputLeaf::Option { name, value } => names.contains(&name.as_str()) && !value.is_empty(),
        InputLeaf::Positional(_) => false,
    })
}

/// A validated usage document plus the flags to match with.
///
/// Every [`parse`](Docopt::parse) call compiles the document afresh, so one
/// handle can be shared freely.
///
/// ```
/// use docopt_engine::{Docopt, DocoptError};
///
/// let docopt = Docopt::new("Usage: prog [-v] <file>").unwrap();
/// let args = docopt.parse(["-v", "a.txt"]).unwrap().into_args().unwrap();
/// assert!(args.get_bool("-v"));
/// assert_eq!(args.get_str("<file>"), Some("a.txt"));
///
/// assert!(matches!(Docopt::new("no usage here"), Err(DocoptError::Grammar(_))));
/// ```
#[derive(Debug, Clone)]
pub struct Docopt {
    doc: String,
    config: ParseConfig,
}

impl Docopt {
    /// Validates `doc`, reporting grammar errors up front.
    pub fn new(doc: impl Into<String>) -> Result<Self> {
        let doc = doc.into();
        build_pattern_tree(&doc)?;
        Ok(Self {
            doc,
            config: ParseConfig::default(),
        })
    }

    pub fn with_config(mut self, config: ParseConfig) -> Self {
        self.config = config;
        self
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// The document's `usage:` section.
    pub fn usage(&self) -> Result<String> {
        usage_section(&self.doc)
    }

    pub fn parse<I, S>(&self, argv: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        parse_with_config(&self.doc, argv, &self.config)
    }
}
