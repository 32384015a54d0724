//! The rewrite engine: read, inject, substitute, compare, write.

use crate::diff::{colorized_diff, unified_diff};
use crate::error::{RestyleError, Result};
use crate::report::{FileReport, Outcome, Reporter, RunSummary};
use crate::selector::{Candidate, CandidateSource};
use crate::transform::{DeclarationInjector, Injection, RuleSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One file's content before and after rewriting.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub original: String,
    pub content: String,
    pub injection: Option<Injection>,
}

impl FileRecord {
    /// Reads a file as UTF-8 text.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| RestyleError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let original = String::from_utf8(bytes).map_err(|_| RestyleError::Encoding {
            path: path.to_path_buf(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            content: original.clone(),
            original,
            injection: None,
        })
    }

    /// Returns true if the content differs from what was read.
    pub fn is_modified(&self) -> bool {
        self.original != self.content
    }

    /// Overwrites the file with the rewritten content.
    pub fn write(&self) -> Result<()> {
        fs::write(&self.path, &self.content).map_err(|source| RestyleError::FileAccess {
            path: self.path.clone(),
            source,
        })
    }

    /// Generates a unified diff of the rewrite.
    pub fn diff(&self) -> String {
        unified_diff(&self.original, &self.content, &self.path)
    }

    /// Generates a colorized diff for terminal display.
    pub fn colorized_diff(&self) -> String {
        colorized_diff(&self.original, &self.content, &self.path)
    }
}

/// Applies a declaration and a rule set to files, one at a time.
#[derive(Debug, Clone, Default)]
pub struct RewriteEngine {
    injector: Option<DeclarationInjector>,
    rules: RuleSet,
    dry_run: bool,
}

impl RewriteEngine {
    /// Creates an engine that applies `rules`.
    ///
    /// Fails if the rules break the ordering checked by [`RuleSet::validate`].
    pub fn new(rules: RuleSet) -> Result<Self> {
        rules.validate()?;
        Ok(Self {
            injector: None,
            rules,
            dry_run: false,
        })
    }

    /// Ensures every rewritten file carries the injector's declaration.
    pub fn declaration(mut self, injector: DeclarationInjector) -> Self {
        self.injector = Some(injector);
        self
    }

    /// Enables dry-run mode (compute outcomes without writing).
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Returns the rules in application order.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Rewrites content in memory. Injection runs before the rules.
    pub fn rewrite(&self, record: &mut FileRecord) {
        if let Some(injector) = &self.injector {
            let injection = injector.inject(&mut record.content);
            if injection == Injection::NoAnchor {
                debug!(path = %record.path.display(), "no declaration line to anchor on; declaration not added");
            }
            record.injection = Some(injection);
        }
        record.content = self.rules.apply_all(&record.content);
    }

    /// Reads, rewrites and (unless dry-run) writes back one file.
    ///
    /// The file is only opened for writing when its content changed.
    pub fn process_file(&self, path: &Path) -> Result<FileRecord> {
        let mut record = FileRecord::read(path)?;
        self.rewrite(&mut record);

        if record.is_modified() && !self.dry_run {
            record.write()?;
        }
        Ok(record)
    }

    /// Processes a candidate, turning any failure into an outcome.
    ///
    /// Returns the record when the file was read.
    pub fn process(&self, candidate: &Candidate) -> (FileReport, Option<FileRecord>) {
        let path = &candidate.path;

        let (outcome, record) = match self.process_file(path) {
            Ok(record) if !record.is_modified() => (Outcome::Unchanged, Some(record)),
            Ok(record) if self.dry_run => (Outcome::WouldUpdate, Some(record)),
            Ok(record) => {
                info!(path = %path.display(), "updated");
                (Outcome::Updated, Some(record))
            }
            Err(err) if candidate.source == CandidateSource::Listed && is_not_found(&err) => {
                debug!(path = %path.display(), "listed file not found");
                (Outcome::Skipped("not found".to_string()), None)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to process file");
                (Outcome::Error(err.to_string()), None)
            }
        };

        (
            FileReport {
                path: path.clone(),
                outcome,
            },
            record,
        )
    }

    /// Processes every candidate in order, reporting as it goes.
    ///
    /// Per-file failures are reported and the run continues. Only a failure
    /// to write the report itself stops it.
    pub fn run<W: Write>(
        &self,
        candidates: &[Candidate],
        reporter: Reporter<W>,
    ) -> Result<RunSummary> {
        let mut reporter = reporter.dry_run(self.dry_run);
        reporter.start(candidates.len())?;

        for candidate in candidates {
            let (report, record) = self.process(candidate);
            reporter.file(&report)?;
            if let Some(record) = record.filter(FileRecord::is_modified) {
                reporter.diff(&record)?;
            }
        }

        let summary = reporter.finish()?;
        info!(
            attempted = summary.attempted,
            updated = summary.updated,
            errors = summary.errors,
            dry_run = self.dry_run,
            "run complete"
        );
        Ok(summary)
    }
}

fn is_not_found(err: &RestyleError) -> bool {
    matches!(
        err,
        RestyleError::FileAccess { source, .. } if source.kind() == io::ErrorKind::NotFound
    )
}
