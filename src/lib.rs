//! # restyle
//!
//! Batch migration of hardcoded styling literals to named references.
//!
//! A migration selects files with glob patterns, makes sure each one carries a
//! required declaration (usually an import), and applies an ordered list of
//! text substitutions. Files are processed one at a time and only written when
//! their content changed, so running the same migration twice is a no-op.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use restyle::prelude::*;
//!
//! let rules = RuleSet::new()
//!     .replace_token("Colors.white", "AppColors.white")?
//!     .replace_literal("const Color(0xFFC41D7F)", "AppColors.burgundy")?
//!     .replace_literal("Color(0xFFC41D7F)", "AppColors.burgundy")?;
//!
//! let engine = RewriteEngine::new(rules)?.declaration(DeclarationInjector::new(
//!     "import 'package:app/constants/app_colors.dart';",
//! )?);
//!
//! let candidates = FileSelector::new()
//!     .pattern("lib/screens/**/*.dart")
//!     .select()?;
//!
//! let summary = engine.run(&candidates, Reporter::stdout())?;
//! println!("{} file(s) updated", summary.updated);
//! # Ok::<(), restyle::error::RestyleError>(())
//! ```
//!
//! ## Config files
//!
//! The same migration can be declared in YAML and loaded with
//! [`MigrationConfig::load`](config::MigrationConfig::load):
//!
//! ```rust,no_run
//! use restyle::prelude::*;
//!
//! let config = MigrationConfig::load("migration.yaml")?;
//! config.validate()?;
//!
//! let candidates = config.selector().select()?;
//! let summary = config.engine()?.dry_run().run(&candidates, Reporter::stdout())?;
//! assert_eq!(summary.attempted, candidates.len());
//! # Ok::<(), restyle::error::RestyleError>(())
//! ```

pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod report;
pub mod selector;
pub mod transform;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{MigrationConfig, RuleSpec};
    pub use crate::diff::DiffStats;
    pub use crate::engine::{FileRecord, RewriteEngine};
    pub use crate::error::{RestyleError, Result};
    pub use crate::report::{DiffStyle, FileReport, Outcome, Reporter, RunSummary};
    pub use crate::selector::{Candidate, CandidateSource, ExclusionSet, FileSelector};
    pub use crate::transform::{DeclarationInjector, Injection, Rule, RuleSet};
}

pub use prelude::*;
