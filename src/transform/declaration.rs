//! Idempotent insertion of a required declaration line.

use crate::error::{RestyleError, Result};
use regex::{Regex, RegexBuilder};

/// The default shape of a declaration line: `import ...;` on a line of its own.
pub const DEFAULT_ANCHOR: &str = r"^import .+;$";

/// What [`DeclarationInjector::inject`] did to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injection {
    /// The declaration was already in the file.
    Present,
    /// The declaration was inserted after the last declaration line.
    Inserted,
    /// The file has no declaration line to anchor on, so nothing was inserted.
    NoAnchor,
}

/// Ensures a declaration line (usually an import) is present in a file.
#[derive(Debug, Clone)]
pub struct DeclarationInjector {
    declaration: String,
    anchor: Regex,
}

impl DeclarationInjector {
    /// Creates an injector that anchors on `import ...;` lines.
    pub fn new(declaration: impl Into<String>) -> Result<Self> {
        Self::with_anchor(declaration, DEFAULT_ANCHOR)
    }

    /// Creates an injector with a custom declaration-line pattern.
    ///
    /// The pattern runs in multi-line mode, so `^` and `$` match at line
    /// boundaries, and `$` also matches before a `\r\n`.
    pub fn with_anchor(declaration: impl Into<String>, anchor: &str) -> Result<Self> {
        let declaration = declaration.into();
        if declaration.trim().is_empty() || declaration.contains('\n') {
            return Err(RestyleError::InvalidConfig(format!(
                "declaration must be a single non-empty line, got {declaration:?}"
            )));
        }

        let anchor = RegexBuilder::new(anchor)
            .multi_line(true)
            .crlf(true)
            .build()?;

        Ok(Self {
            declaration,
            anchor,
        })
    }

    /// Returns the declaration line this injector adds.
    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    /// Inserts the declaration after the last declaration line in `content`.
    ///
    /// Content that already contains the declaration verbatim is left alone.
    /// Content without any declaration line is also left alone.
    pub fn inject(&self, content: &mut String) -> Injection {
        if content.contains(&self.declaration) {
            return Injection::Present;
        }

        let Some(anchor) = self.anchor.find_iter(content).last() else {
            return Injection::NoAnchor;
        };

        let end = anchor.end();
        let line_break = if content[end..].starts_with("\r\n") {
            "\r\n"
        } else {
            "\n"
        };
        content.insert_str(end, &format!("{line_break}{}", self.declaration));

        Injection::Inserted
    }
}
