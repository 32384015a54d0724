//! Per-file outcomes and the run summary.

use crate::diff::DiffStats;
use crate::engine::FileRecord;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The result of processing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file was rewritten.
    Updated,
    /// The file would be rewritten, but this is a dry run.
    WouldUpdate,
    /// Nothing to change; the file was not written.
    Unchanged,
    /// The file was not processed.
    Skipped(String),
    /// The file could not be read or written.
    Error(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Updated => write!(f, "✓ Updated"),
            Outcome::WouldUpdate => write!(f, "✓ Would update"),
            Outcome::Unchanged => write!(f, "No changes needed"),
            Outcome::Skipped(reason) => write!(f, "⊘ Skipped ({reason})"),
            Outcome::Error(message) => write!(f, "✗ Error: {message}"),
        }
    }
}

/// An outcome tied to the file it belongs to.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Counters for a whole run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub errors: usize,
    pub dry_run: bool,
}

impl RunSummary {
    /// Counts one outcome.
    pub fn record(&mut self, outcome: &Outcome) {
        self.attempted += 1;
        match outcome {
            Outcome::Updated | Outcome::WouldUpdate => self.updated += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Error(_) => self.errors += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run { "Would update" } else { "Updated" };
        write!(f, "✓ {verb} {} of {} file(s)", self.updated, self.attempted)?;
        if self.errors > 0 {
            write!(f, ", {} error(s)", self.errors)?;
        }
        Ok(())
    }
}

/// How rewrites are previewed in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffStyle {
    Plain,
    Color,
}

/// Writes one line per file and a summary line to a sink.
pub struct Reporter<W: Write> {
    out: W,
    display_root: Option<PathBuf>,
    diffs: Option<DiffStyle>,
    summary: RunSummary,
}

impl Reporter<io::Stdout> {
    /// Creates a reporter that prints to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    /// Creates a reporter that writes to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            display_root: None,
            diffs: None,
            summary: RunSummary::default(),
        }
    }

    /// Shows paths relative to `root` where possible.
    pub fn display_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.display_root = Some(root.into());
        self
    }

    /// Prints a diff under each rewritten file.
    pub fn show_diffs(mut self, style: DiffStyle) -> Self {
        self.diffs = Some(style);
        self
    }

    /// Marks the summary as a dry run.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.summary.dry_run = dry_run;
        self
    }

    /// Announces the size of the candidate set.
    pub fn start(&mut self, total: usize) -> io::Result<()> {
        writeln!(self.out, "Found {total} files to update\n")
    }

    /// Records and prints one file's outcome.
    pub fn file(&mut self, report: &FileReport) -> io::Result<()> {
        self.summary.record(&report.outcome);
        writeln!(
            self.out,
            "Processing {}... {}",
            self.relative(&report.path).display(),
            report.outcome
        )
    }

    /// Prints the rewrite of a file, if diffs are enabled.
    pub fn diff(&mut self, record: &FileRecord) -> io::Result<()> {
        let diff = match self.diffs {
            Some(DiffStyle::Plain) => record.diff(),
            Some(DiffStyle::Color) => record.colorized_diff(),
            None => return Ok(()),
        };
        let stats = DiffStats::from_diff(&record.original, &record.content);
        writeln!(self.out, "{diff}  {stats}")
    }

    /// Prints the summary line and returns the final counters.
    pub fn finish(mut self) -> io::Result<RunSummary> {
        writeln!(self.out, "\n{}", self.summary)?;
        self.out.flush()?;
        Ok(self.summary)
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        match &self.display_root {
            Some(root) => path.strip_prefix(root).unwrap_or(path),
            None => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(path: &str, outcome: Outcome) -> FileReport {
        FileReport {
            path: PathBuf::from(path),
            outcome,
        }
    }

    #[test]
    fn test_report_lines_and_summary() {
        let mut out = Vec::new();
        let mut reporter = Reporter::new(&mut out).display_root("/app/lib/screens");

        reporter.start(3).unwrap();
        reporter
            .file(&report("/app/lib/screens/login_screen.dart", Outcome::Updated))
            .unwrap();
        reporter
            .file(&report("/app/lib/screens/home.dart", Outcome::Unchanged))
            .unwrap();
        reporter
            .file(&report(
                "/app/lib/widgets/card.dart",
                Outcome::Error("permission denied".to_string()),
            ))
            .unwrap();
        let summary = reporter.finish().unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Found 3 files to update\n\n\
             Processing login_screen.dart... ✓ Updated\n\
             Processing home.dart... No changes needed\n\
             Processing /app/lib/widgets/card.dart... ✗ Error: permission denied\n\
             \n✓ Updated 1 of 3 file(s), 1 error(s)\n"
        );
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_diffs_are_opt_in() {
        let record = FileRecord {
            path: PathBuf::from("/app/lib/home.dart"),
            original: "Colors.white\n".to_string(),
            content: "AppColors.white\n".to_string(),
            injection: None,
        };

        let mut quiet = Vec::new();
        Reporter::new(&mut quiet).diff(&record).unwrap();
        assert!(quiet.is_empty());

        let mut out = Vec::new();
        Reporter::new(&mut out)
            .show_diffs(DiffStyle::Plain)
            .diff(&record)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("-Colors.white\n+AppColors.white\n"));
        assert!(text.ends_with("  1 insertions(+), 1 deletions(-)\n"));
    }

    #[test]
    fn test_dry_run_summary() {
        let mut summary = RunSummary {
            dry_run: true,
            ..Default::default()
        };
        summary.record(&Outcome::WouldUpdate);
        summary.record(&Outcome::Skipped("not found".to_string()));

        assert_eq!(summary.to_string(), "✓ Would update 1 of 2 file(s)");
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_outcome_markers() {
        assert_eq!(
            Outcome::Skipped("not found".to_string()).to_string(),
            "⊘ Skipped (not found)"
        );
        assert_eq!(Outcome::WouldUpdate.to_string(), "✓ Would update");
    }
}
