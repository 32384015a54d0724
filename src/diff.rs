//! Diff rendering for previewing rewrites.

use similar::{ChangeTag, TextDiff};
use std::fmt;
use std::path::Path;

struct Palette {
    header: &'static str,
    delete: &'static str,
    insert: &'static str,
    reset: &'static str,
}

const PLAIN: Palette = Palette {
    header: "",
    delete: "",
    insert: "",
    reset: "",
};

// ANSI color codes
const ANSI: Palette = Palette {
    header: "\x1b[36m",
    delete: "\x1b[31m",
    insert: "\x1b[32m",
    reset: "\x1b[0m",
};

/// Generates a unified diff between two strings.
pub fn unified_diff(original: &str, modified: &str, path: &Path) -> String {
    render(original, modified, path, &PLAIN)
}

/// Generates a colorized unified diff for terminal display.
pub fn colorized_diff(original: &str, modified: &str, path: &Path) -> String {
    render(original, modified, path, &ANSI)
}

fn render(original: &str, modified: &str, path: &Path, palette: &Palette) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    let (header, reset) = (palette.header, palette.reset);
    output.push_str(&format!("{header}--- a/{}{reset}\n", path.display()));
    output.push_str(&format!("{header}+++ b/{}{reset}\n", path.display()));

    for group in diff.grouped_ops(3) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old = first.old_range().start..last.old_range().end;
        let new = first.new_range().start..last.new_range().end;
        output.push_str(&format!(
            "{header}@@ -{},{} +{},{} @@{reset}\n",
            old.start + 1,
            old.len(),
            new.start + 1,
            new.len()
        ));

        for op in &group {
            for change in diff.iter_changes(op) {
                let (sign, color) = match change.tag() {
                    ChangeTag::Delete => ("-", palette.delete),
                    ChangeTag::Insert => ("+", palette.insert),
                    ChangeTag::Equal => (" ", ""),
                };
                let reset = if color.is_empty() { "" } else { reset };

                output.push_str(&format!("{color}{sign}{}{reset}", change.value()));
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}

/// Line counts for one rewrite.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffStats {
    /// Counts inserted and deleted lines between two versions.
    pub fn from_diff(original: &str, modified: &str) -> Self {
        let diff = TextDiff::from_lines(original, modified);
        let mut stats = Self::default();

        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => stats.insertions += 1,
                ChangeTag::Delete => stats.deletions += 1,
                ChangeTag::Equal => {}
            }
        }

        stats
    }
}

impl fmt::Display for DiffStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} insertions(+), {} deletions(-)",
            self.insertions, self.deletions
        )
    }
}
