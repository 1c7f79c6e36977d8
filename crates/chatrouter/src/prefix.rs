//! Prefix checks decide whether a message is a command invocation

use regex::Regex;

use crate::error::Result;

/// Strips a command prefix from message text
pub trait PrefixCheck: Send + Sync {
    /// Return the text after the prefix, or `None` if the prefix is absent
    fn strip<'a>(&self, text: &'a str) -> Option<&'a str>;
}

/// A single literal prefix
#[derive(Debug, Clone)]
pub struct StaticPrefix {
    prefix: String,
    case_insensitive: bool,
}

impl StaticPrefix {
    /// Create a new literal prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            case_insensitive: false,
        }
    }

    /// Set whether ASCII case is ignored when matching
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn match_len(&self, text: &str) -> Option<usize> {
        let head = text.get(..self.prefix.len())?;
        let matched = if self.case_insensitive {
            head.eq_ignore_ascii_case(&self.prefix)
        } else {
            head == self.prefix
        };
        matched.then_some(self.prefix.len())
    }
}

impl PrefixCheck for StaticPrefix {
    fn strip<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.match_len(text).map(|len| &text[len..])
    }
}

/// Several literal prefixes; the longest match wins
#[derive(Debug, Clone)]
pub struct MultiplePrefix {
    prefixes: Vec<StaticPrefix>,
}

impl MultiplePrefix {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(StaticPrefix::new).collect(),
        }
    }

    /// Set whether ASCII case is ignored when matching
    pub fn with_case_insensitive(self, case_insensitive: bool) -> Self {
        Self {
            prefixes: self
                .prefixes
                .into_iter()
                .map(|p| p.with_case_insensitive(case_insensitive))
                .collect(),
        }
    }
}

impl PrefixCheck for MultiplePrefix {
    fn strip<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.prefixes
            .iter()
            .filter_map(|p| p.match_len(text))
            .max()
            .map(|len| &text[len..])
    }
}

/// A regular expression matched at the start of the text
#[derive(Debug, Clone)]
pub struct RegexPrefix {
    pattern: Regex,
}

impl RegexPrefix {
    /// Compile a prefix pattern; it is anchored to the start of the text
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"\A(?:{})", pattern))?;
        Ok(Self { pattern })
    }
}

impl PrefixCheck for RegexPrefix {
    fn strip<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.pattern
            .find(text)
            .filter(|m| !m.as_str().is_empty())
            .map(|m| &text[m.end()..])
    }
}
