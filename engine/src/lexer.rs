//! Section extraction and usage-pattern lexing.
//!
//! A usage document is plain text. Two kinds of labelled sections matter:
//! the single `usage:` section holding the patterns, and any number of
//! `options:` sections describing options. A section is the labelled line plus
//! every immediately following line that starts with a space or tab.
//!
//! Pattern text is lexed in two stages. The strong delimiters `[ ] ( ) |` and
//! `...` are split out wherever they occur, even glued to a word; the text
//! between them is then split into words, keeping `<angle placeholders>`
//! (which may contain spaces) together as one word.

use std::sync::LazyLock;

use regex::Regex;

use crate::tokens::{TokenMode, Tokens};

/// Labels of the sections a usage document may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLabel {
    Usage,
    Options,
}

static USAGE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^([^\n]*usage:[^\n]*(?:\n[ \t][^\n]*)*)").expect("static regex must compile")
});

static OPTIONS_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^([^\n]*options:[^\n]*(?:\n[ \t][^\n]*)*)")
        .expect("static regex must compile")
});

// One bracket, paren or pipe character, or an ellipsis.
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*([\[\]()|]|\.\.\.)").expect("static regex must compile")
});

// A run ending in a `<...>` placeholder, or a run without angle brackets.
static WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(\S*<.*?>|[^<>\s]+)").expect("static regex must compile"));

impl SectionLabel {
    fn regex(self) -> &'static Regex {
        match self {
            SectionLabel::Usage => &USAGE_SECTION,
            SectionLabel::Options => &OPTIONS_SECTION,
        }
    }
}

/// Returns every section with the given label, trimmed, in document order.
///
/// Label matching is case-insensitive and the label may appear anywhere in
/// the header line (`Naval Fate usage:` is a usage section).
pub fn parse_section(label: SectionLabel, doc: &str) -> Vec<String> {
    label
        .regex()
        .captures_iter(doc)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Lexes a usage pattern into grammar-mode tokens.
pub fn lex_pattern(source: &str) -> Tokens {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in SEPARATORS.captures_iter(source) {
        let (Some(whole), Some(delimiter)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        lex_words(&source[last..whole.start()], &mut tokens);
        tokens.push(delimiter.as_str().to_string());
        last = whole.end();
    }
    lex_words(&source[last..], &mut tokens);

    Tokens::new(tokens, TokenMode::Grammar)
}

fn lex_words(text: &str, out: &mut Vec<String>) {
    out.extend(
        WORDS
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
    );
}

/// Rewrites a raw usage section into one parenthesized expression.
///
/// The first word after the label is the program name. Each time it
/// reappears a new alternative starts, so
///
/// ```text
/// Usage: prog ship new <name>...
///        prog mine (set|remove) <x> <y>
/// ```
///
/// becomes `( ship new <name>... ) | ( mine (set|remove) <x> <y> )`.
pub fn formal_usage(section: &str) -> String {
    let body = section.find(':').map_or(section, |idx| &section[idx + 1..]);
    let mut words = body.split_whitespace();

    let mut formal = String::from("(");
    if let Some(program) = words.next() {
        for word in words {
            if word == program {
                formal.push_str(" ) | (");
            } else {
                formal.push(' ');
                formal.push_str(word);
            }
        }
    }
    formal.push_str(" )");
    formal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(mut tokens: Tokens) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(token) = tokens.pop() {
            out.push(token);
        }
        out
    }

    const NAVAL_FATE: &str = "Naval Fate.

Usage:
  naval_fate ship new <name>...
  naval_fate ship <name> move <x> <y> [--speed=<kn>]
  naval_fate -h | --help

Options:
  -h --help     Show this screen.
  --speed=<kn>  Speed in knots [default: 10].
";

    #[test]
    fn test_section_collects_indented_lines() {
        let usage = parse_section(SectionLabel::Usage, NAVAL_FATE);
        assert_eq!(usage.len(), 1);
        assert!(usage[0].starts_with("Usage:"));
        assert!(usage[0].ends_with("naval_fate -h | --help"));
        assert_eq!(usage[0].lines().count(), 4);

        let options = parse_section(SectionLabel::Options, NAVAL_FATE);
        assert_eq!(options.len(), 1);
        assert!(options[0].contains("--speed=<kn>"));
    }

    #[test]
    fn test_section_label_is_case_insensitive_and_repeatable() {
        let doc = "USAGE: prog\n\nusage: prog -a\nmore text";
        let sections = parse_section(SectionLabel::Usage, doc);
        assert_eq!(sections, vec!["USAGE: prog", "usage: prog -a"]);
        assert!(parse_section(SectionLabel::Options, doc).is_empty());
    }

    #[test]
    fn test_section_stops_at_blank_line() {
        let doc = "Options: -a  All\n  -b  Both\n\n  -c  Not part of it\n";
        let sections = parse_section(SectionLabel::Options, doc);
        assert_eq!(sections, vec!["Options: -a  All\n  -b  Both"]);
    }

    #[test]
    fn test_lex_splits_glued_delimiters() {
        let tokens = drain(lex_pattern("( ship [--speed=<kn>]... (a|b) )"));
        assert_eq!(
            tokens,
            vec![
                "(", "ship", "[", "--speed=<kn>", "]", "...", "(", "a", "|", "b", ")", ")"
            ]
        );
    }

    #[test]
    fn test_lex_keeps_placeholders_with_spaces() {
        let tokens = drain(lex_pattern("<input file> FILE"));
        assert_eq!(tokens, vec!["<input file>", "FILE"]);
    }

    #[test]
    fn test_lex_text_after_last_delimiter() {
        let tokens = drain(lex_pattern("[-v] go"));
        assert_eq!(tokens, vec!["[", "-v", "]", "go"]);
    }

    #[test]
    fn test_formal_usage_joins_lines_by_program_name() {
        let usage = "Usage: prog ship new <name>...\n       prog mine (set|remove)";
        assert_eq!(
            formal_usage(usage),
            "( ship new <name>... ) | ( mine (set|remove) )"
        );
    }

    #[test]
    fn test_formal_usage_without_words() {
        assert_eq!(formal_usage("usage:"), "( )");
        assert_eq!(formal_usage("usage: prog"), "( )");
    }
}
