//! A single ordered substitution.

use crate::error::Result;
use regex::{NoExpand, Regex};

/// A `(pattern, replacement)` pair.
///
/// The pattern is matched against raw file text. The replacement is inserted
/// verbatim: `$1` or `${name}` in it are not expanded.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    /// Creates a rule from a regex pattern.
    pub fn pattern(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// Creates a rule that replaces an exact piece of text.
    pub fn literal(needle: &str, replacement: impl Into<String>) -> Result<Self> {
        Self::pattern(&regex::escape(needle), replacement)
    }

    /// Creates a rule that replaces a token only where it stands on its own.
    ///
    /// `Colors.white` matches in `Colors.white,` but not in `Colors.whitespace`
    /// or `MyColors.white`.
    pub fn token(token: &str, replacement: impl Into<String>) -> Result<Self> {
        Self::pattern(&format!(r"\b{}\b", regex::escape(token)), replacement)
    }

    /// Returns the compiled pattern.
    pub fn regex(&self) -> &Regex {
        &self.pattern
    }

    /// Returns the replacement text.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replaces every match in `source`.
    pub fn replace_all(&self, source: &str) -> String {
        self.pattern
            .replace_all(source, NoExpand(&self.replacement))
            .into_owned()
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Replace pattern '{}' with '{}'",
            self.pattern.as_str(),
            self.replacement
        )
    }
}
