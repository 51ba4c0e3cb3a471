//! Position-tracked cursor over a token list.
//!
//! The same cursor walks two very different inputs: words lexed out of the
//! usage text, and the raw argv vector. The [`TokenMode`] tells option
//! resolution which one it is looking at, because a few rules differ (unique
//! prefixes are only accepted in argv, and only argv tokens bind values).

/// What a [`Tokens`] cursor is reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMode {
    /// Words of a usage pattern; builds the grammar.
    Grammar,
    /// The user's argument vector; builds the input leaves.
    Argv,
}

#[derive(Debug, Clone)]
pub struct Tokens {
    tokens: Vec<String>,
    index: usize,
    mode: TokenMode,
}

impl Tokens {
    pub fn new(tokens: Vec<String>, mode: TokenMode) -> Self {
        Self {
            tokens,
            index: 0,
            mode,
        }
    }

    pub fn from_argv<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(argv.into_iter().map(Into::into).collect(), TokenMode::Argv)
    }

    /// The token under the cursor, if any remain.
    pub fn current(&self) -> Option<&str> {
        self.tokens.get(self.index).map(String::as_str)
    }

    /// Consumes and returns the token under the cursor.
    pub fn pop(&mut self) -> Option<String> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    pub fn is_empty(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// The unconsumed tokens joined by single spaces.
    pub fn rest(&self) -> String {
        self.tokens
            .get(self.index..)
            .map(|rest| rest.join(" "))
            .unwrap_or_default()
    }

    pub fn mode(&self) -> TokenMode {
        self.mode
    }

    pub fn is_parsing_argv(&self) -> bool {
        self.mode == TokenMode::Argv
    }
}
