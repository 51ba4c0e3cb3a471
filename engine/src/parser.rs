//! Recursive-descent parser for usage patterns, and the argv tokenizer.
//!
//! Grammar of a (formalized) usage pattern:
//!
//! ```text
//! pattern ::= expr
//! expr    ::= seq ( '|' seq )*
//! seq     ::= ( atom [ '...' ] )*
//! atom    ::= '(' expr ')' | '[' expr ']' | 'options'
//!           | long | shorts | argument | command
//! ```
//!
//! Options are resolved against an [`OptionRegistry`] in both passes. The
//! usage pass may grow it with options only mentioned in the patterns; the
//! argv pass may grow it with unknown `--long` or `-s` tokens the user typed.

use docopt_core::Value;
use tracing::trace;

use crate::error::{DocoptError, OptionError, Result};
use crate::input::InputLeaf;
use crate::lexer::lex_pattern;
use crate::options::{OptionRegistry, OptionSpec};
use crate::pattern::{Leaf, LeafArena, Pattern};
use crate::tokens::Tokens;

/// An option token resolved against the registry.
///
/// `value` is only set when reading argv; usage text never binds values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOption {
    pub spec: OptionSpec,
    pub value: Option<Value>,
}

/// Resolves a `--long`, `--long=value` or `--long value` token.
///
/// An exact long-name match wins. Reading argv, a unique prefix of a known
/// long option is accepted too (`--verb` for `--verbose`). Unknown options
/// are registered on the fly, taking a value iff written with `=`.
pub fn parse_long(
    tokens: &mut Tokens,
    registry: &mut OptionRegistry,
) -> std::result::Result<ResolvedOption, OptionError> {
    let token = tokens.pop().unwrap_or_default();
    let (long, attached) = match token.split_once('=') {
        Some((long, value)) => (long.to_string(), Some(value.to_string())),
        None => (token, None),
    };

    let mut similar: Vec<OptionSpec> = registry.find_long(&long).into_iter().cloned().collect();
    if tokens.is_parsing_argv() && similar.is_empty() {
        similar = registry
            .long_prefix_matches(&long)
            .into_iter()
            .cloned()
            .collect();
    }

    if similar.len() > 1 {
        let candidates = similar
            .iter()
            .map(|o| o.long.as_deref().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(OptionError::AmbiguousPrefix {
            prefix: long,
            candidates,
        });
    }

    let Some(spec) = similar.pop() else {
        let takes_value = attached.is_some();
        let spec = OptionSpec::new(None, Some(&long), takes_value, Value::Bool(false));
        trace!(option = %long, takes_value, "registering undeclared long option");
        registry.register(spec.clone());

        let value = tokens.is_parsing_argv().then(|| match attached {
            Some(v) => Value::String(v),
            None => Value::Bool(true),
        });
        return Ok(ResolvedOption { spec, value });
    };

    let display = spec.long.clone().unwrap_or(long);
    let mut attached = attached;
    if !spec.takes_value {
        if attached.is_some() {
            return Err(OptionError::UnexpectedArgument(display));
        }
    } else if attached.is_none() {
        match tokens.current() {
            None | Some("--") => return Err(OptionError::MissingArgument(display)),
            Some(_) => attached = tokens.pop(),
        }
    }

    let value = tokens
        .is_parsing_argv()
        .then(|| attached.map_or(Value::Bool(true), Value::String));
    Ok(ResolvedOption { spec, value })
}

/// Resolves a cluster of short options such as `-v`, `-abc` or `-ofile`.
///
/// Each character is one short option. A value-taking option consumes the
/// rest of the cluster, or the next token when it ends the cluster.
pub fn parse_short(
    tokens: &mut Tokens,
    registry: &mut OptionRegistry,
) -> std::result::Result<Vec<ResolvedOption>, OptionError> {
    let token = tokens.pop().unwrap_or_default();
    let mut rest = token.strip_prefix('-').unwrap_or(&token);
    let mut resolved = Vec::new();

    while let Some(ch) = rest.chars().next() {
        rest = &rest[ch.len_utf8()..];
        let short = format!("-{ch}");

        let mut similar: Vec<OptionSpec> =
            registry.find_short(&short).into_iter().cloned().collect();
        if similar.len() > 1 {
            return Err(OptionError::AmbiguousShort {
                option: short,
                count: similar.len(),
            });
        }

        let Some(spec) = similar.pop() else {
            let spec = OptionSpec::flag(Some(&short), None);
            trace!(option = %short, "registering undeclared short option");
            registry.register(spec.clone());
            let value = tokens.is_parsing_argv().then_some(Value::Bool(true));
            resolved.push(ResolvedOption { spec, value });
            continue;
        };

        let mut attached = None;
        if spec.takes_value {
            if rest.is_empty() {
                match tokens.current() {
                    None | Some("--") => return Err(OptionError::MissingArgument(short)),
                    Some(_) => attached = tokens.pop(),
                }
            } else {
                attached = Some(rest.to_string());
                rest = "";
            }
        }

        let value = tokens
            .is_parsing_argv()
            .then(|| attached.map_or(Value::Bool(true), Value::String));
        resolved.push(ResolvedOption { spec, value });
    }

    Ok(resolved)
}

/// `true` for `<placeholder>` words and all-uppercase words like `FILE`.
pub fn is_argument_spec(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    (token.starts_with('<') && token.ends_with('>')) || token.chars().all(char::is_uppercase)
}

/// Parses a formalized usage pattern into a tree rooted at one `Required`.
///
/// Leaves are allocated in `arena`; options not yet known are added to
/// `registry`.
pub fn parse_pattern(
    source: &str,
    registry: &mut OptionRegistry,
    arena: &mut LeafArena,
) -> Result<Pattern> {
    let mut parser = GrammarParser {
        tokens: lex_pattern(source),
        registry,
        arena,
    };
    let result = parser.parse_expr()?;

    if !parser.tokens.is_empty() {
        return Err(DocoptError::Grammar(format!(
            "Unexpected ending: '{}'",
            parser.tokens.rest()
        )));
    }

    Ok(Pattern::Required(result))
}

struct GrammarParser<'a> {
    tokens: Tokens,
    registry: &'a mut OptionRegistry,
    arena: &'a mut LeafArena,
}

impl GrammarParser<'_> {
    fn parse_expr(&mut self) -> Result<Vec<Pattern>> {
        let seq = self.parse_seq()?;
        if self.tokens.current() != Some("|") {
            return Ok(seq);
        }

        let mut alternatives = vec![collapse_to_required(seq)];
        while self.tokens.current() == Some("|") {
            self.tokens.pop();
            let seq = self.parse_seq()?;
            alternatives.push(collapse_to_required(seq));
        }

        Ok(vec![collapse_to_either(alternatives)])
    }

    fn parse_seq(&mut self) -> Result<Vec<Pattern>> {
        let mut seq = Vec::new();

        while let Some(token) = self.tokens.current() {
            if matches!(token, "]" | ")" | "|") {
                break;
            }

            let mut atom = self.parse_atom()?;
            if self.tokens.current() == Some("...") {
                self.tokens.pop();
                // A short cluster can expand to several leaves.
                let child = if atom.len() == 1 {
                    atom.remove(0)
                } else {
                    Pattern::Required(atom)
                };
                seq.push(Pattern::OneOrMore(Box::new(child)));
            } else {
                seq.extend(atom);
            }
        }

        Ok(seq)
    }

    fn parse_atom(&mut self) -> Result<Vec<Pattern>> {
        let Some(token) = self.tokens.current().map(str::to_string) else {
            return Ok(Vec::new());
        };

        match token.as_str() {
            "[" => {
                self.tokens.pop();
                let expr = self.parse_expr()?;
                if self.tokens.pop().as_deref() != Some("]") {
                    return Err(DocoptError::Grammar("Mismatched '['".to_string()));
                }
                Ok(vec![Pattern::Optional(expr)])
            }
            "(" => {
                self.tokens.pop();
                let expr = self.parse_expr()?;
                if self.tokens.pop().as_deref() != Some(")") {
                    return Err(DocoptError::Grammar("Mismatched '('".to_string()));
                }
                Ok(vec![Pattern::Required(expr)])
            }
            "options" => {
                self.tokens.pop();
                Ok(vec![Pattern::OptionsShortcut(Vec::new())])
            }
            t if t.starts_with("--") && t != "--" => {
                let resolved = parse_long(&mut self.tokens, self.registry)
                    .map_err(OptionError::into_grammar)?;
                Ok(vec![self.arena.leaf(Leaf::option(&resolved.spec))])
            }
            t if t.starts_with('-') && t != "-" && t != "--" => {
                let resolved = parse_short(&mut self.tokens, self.registry)
                    .map_err(OptionError::into_grammar)?;
                Ok(resolved
                    .iter()
                    .map(|r| self.arena.leaf(Leaf::option(&r.spec)))
                    .collect())
            }
            t if is_argument_spec(t) => {
                self.tokens.pop();
                Ok(vec![self.arena.leaf(Leaf::argument(token.as_str()))])
            }
            _ => {
                self.tokens.pop();
                Ok(vec![self.arena.leaf(Leaf::command(token.as_str()))])
            }
        }
    }
}

fn collapse_to_required(mut seq: Vec<Pattern>) -> Pattern {
    if seq.len() == 1 {
        return seq.remove(0);
    }
    Pattern::Required(seq)
}

fn collapse_to_either(mut alternatives: Vec<Pattern>) -> Pattern {
    if alternatives.len() == 1 {
        return alternatives.remove(0);
    }
    Pattern::Either(alternatives)
}

/// Classifies argv into input leaves.
///
/// With `options_first`, the first positional token ends option parsing and
/// it and everything after it are positional. `--` always ends option
/// parsing; the `--` itself is kept as a positional token so a `[--]`
/// command in the grammar can match it.
pub fn parse_argv(
    mut tokens: Tokens,
    registry: &mut OptionRegistry,
    options_first: bool,
) -> Result<Vec<InputLeaf>> {
    let mut parsed = Vec::new();

    while let Some(token) = tokens.current() {
        if token == "--" || (options_first && !is_option_token(token)) {
            while let Some(rest) = tokens.pop() {
                parsed.push(InputLeaf::Positional(rest));
            }
        } else if token.starts_with("--") {
            let resolved =
                parse_long(&mut tokens, registry).map_err(OptionError::into_argument)?;
            parsed.push(into_input(resolved));
        } else if is_option_token(token) {
            let resolved =
                parse_short(&mut tokens, registry).map_err(OptionError::into_argument)?;
            parsed.extend(resolved.into_iter().map(into_input));
        } else if let Some(positional) = tokens.pop() {
            parsed.push(InputLeaf::Positional(positional));
        }
    }

    Ok(parsed)
}

fn is_option_token(token: &str) -> bool {
    token.starts_with('-') && token != "-"
}

fn into_input(resolved: ResolvedOption) -> InputLeaf {
    InputLeaf::option(
        resolved.spec.name(),
        resolved.value.unwrap_or(Value::Bool(true)),
    )
}
