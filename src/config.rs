//! Serializable migration definitions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::RewriteEngine;
use crate::error::{RestyleError, Result};
use crate::selector::{DEFAULT_EXCLUSION_MARKER, ExclusionSet, FileSelector};
use crate::transform::declaration::DEFAULT_ANCHOR;
use crate::transform::{DeclarationInjector, Rule, RuleSet};

/// A serializable specification for one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RuleSpec {
    /// Replace a token where it stands on its own (word-boundary anchored).
    #[serde(rename = "token")]
    Token { from: String, to: String },

    /// Replace an exact piece of text.
    #[serde(rename = "literal")]
    Literal { from: String, to: String },

    /// Replace using a regex pattern. The replacement is still literal.
    #[serde(rename = "pattern")]
    Pattern { pattern: String, replacement: String },
}

impl RuleSpec {
    /// Compiles this spec into a rule.
    pub fn to_rule(&self) -> Result<Rule> {
        match self {
            RuleSpec::Token { from, to } => Rule::token(from, to.as_str()),
            RuleSpec::Literal { from, to } => Rule::literal(from, to.as_str()),
            RuleSpec::Pattern {
                pattern,
                replacement,
            } => Rule::pattern(pattern, replacement.as_str()),
        }
    }
}

fn default_exclusion_marker() -> Option<String> {
    Some(DEFAULT_EXCLUSION_MARKER.to_string())
}

fn default_anchor() -> String {
    DEFAULT_ANCHOR.to_string()
}

/// A migration: which files, which declaration, which rules.
///
/// # Example YAML
///
/// ```yaml
/// name: palette-migration
/// patterns:
///   - lib/screens/**/*.dart
/// exclude:
///   - lib/screens/login_screen.dart
/// declaration: "import 'package:app/constants/app_colors.dart';"
/// rules:
///   - type: token
///     from: Colors.white
///     to: AppColors.white
///   - type: literal
///     from: const Color(0xFFC41D7F)
///     to: AppColors.burgundy
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Name shown in logs.
    pub name: String,

    /// Glob patterns selecting files (`**` crosses directories).
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Explicit files. Missing ones are skipped at run time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<PathBuf>,

    /// Files already migrated by an earlier run.
    #[serde(default)]
    pub exclude: Vec<PathBuf>,

    /// Substring that drops a path from the selection; `null` disables it.
    #[serde(default = "default_exclusion_marker")]
    pub exclusion_marker: Option<String>,

    /// Line every rewritten file must contain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration: Option<String>,

    /// Shape of a declaration line; the new one goes after the last match.
    #[serde(default = "default_anchor")]
    pub anchor: String,

    /// Report paths are shown relative to this directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_root: Option<PathBuf>,

    /// Rules, most specific first.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl MigrationConfig {
    /// Creates an empty config.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            patterns: Vec::new(),
            files: Vec::new(),
            exclude: Vec::new(),
            exclusion_marker: default_exclusion_marker(),
            declaration: None,
            anchor: default_anchor(),
            display_root: None,
            rules: Vec::new(),
        }
    }

    /// Load config from a YAML or JSON file, chosen by extension.
    ///
    /// Relative paths in the file resolve against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RestyleError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file {}: {}", path.display(), e),
            ))
        })?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => {
                return Err(RestyleError::InvalidConfig(format!(
                    "unsupported config format: {} (expected .yaml, .yml or .json)",
                    path.display()
                )));
            }
        };

        let base = path.parent().unwrap_or(Path::new(""));
        Ok(config.resolve_relative(base))
    }

    /// Parse config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            RestyleError::InvalidConfig(format!("Failed to parse YAML config: {}", e))
        })
    }

    /// Parse config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            RestyleError::InvalidConfig(format!("Failed to parse JSON config: {}", e))
        })
    }

    /// Serialize config to YAML text.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            RestyleError::InvalidConfig(format!("Failed to serialize config: {}", e))
        })
    }

    /// Makes relative paths relative to `base` instead.
    pub fn resolve_relative(mut self, base: &Path) -> Self {
        let join = |p: &Path| {
            if p.is_relative() {
                base.join(p)
            } else {
                p.to_path_buf()
            }
        };

        self.patterns = self
            .patterns
            .iter()
            .map(|p| join(Path::new(p)).to_string_lossy().into_owned())
            .collect();
        self.files = self.files.iter().map(|p| join(p.as_path())).collect();
        self.exclude = self.exclude.iter().map(|p| join(p.as_path())).collect();
        self.display_root = self.display_root.as_deref().map(join);
        self
    }

    /// Checks the config can drive a run.
    pub fn validate(&self) -> Result<()> {
        if self.patterns.is_empty() && self.files.is_empty() {
            return Err(RestyleError::InvalidConfig(
                "no patterns or files to select".to_string(),
            ));
        }
        if self.rules.is_empty() && self.declaration.is_none() {
            return Err(RestyleError::InvalidConfig(
                "no rules and no declaration; nothing to do".to_string(),
            ));
        }
        self.rule_set()?;
        self.injector()?;
        Ok(())
    }

    /// Builds the rule set and checks its ordering.
    pub fn rule_set(&self) -> Result<RuleSet> {
        let mut rules = RuleSet::new();
        for spec in &self.rules {
            rules = rules.rule(spec.to_rule()?);
        }
        rules.validate()?;
        Ok(rules)
    }

    /// Builds the declaration injector, if a declaration is configured.
    pub fn injector(&self) -> Result<Option<DeclarationInjector>> {
        self.declaration
            .as_deref()
            .map(|d| DeclarationInjector::with_anchor(d, &self.anchor))
            .transpose()
    }

    /// Builds the file selector.
    pub fn selector(&self) -> FileSelector {
        FileSelector::new()
            .patterns(self.patterns.iter().cloned())
            .files(self.files.iter().cloned())
            .exclusion_marker(self.exclusion_marker.clone())
            .excluding(self.exclude.iter().collect::<ExclusionSet>())
    }

    /// Builds the rewrite engine.
    pub fn engine(&self) -> Result<RewriteEngine> {
        let engine = RewriteEngine::new(self.rule_set()?)?;
        Ok(match self.injector()? {
            Some(injector) => engine.declaration(injector),
            None => engine,
        })
    }

    /// A starter config for migrating Flutter color literals to a palette class.
    pub fn sample() -> Self {
        let token = |from: &str, to: &str| RuleSpec::Token {
            from: from.to_string(),
            to: to.to_string(),
        };
        let literal = |from: &str, to: &str| RuleSpec::Literal {
            from: from.to_string(),
            to: to.to_string(),
        };

        Self {
            patterns: vec!["lib/screens/**/*.dart".to_string()],
            exclude: vec![PathBuf::from("lib/screens/login_screen.dart")],
            declaration: Some("import 'package:app/constants/app_colors.dart';".to_string()),
            display_root: Some(PathBuf::from("lib/screens")),
            rules: vec![
                token("Colors.white", "AppColors.white"),
                token("Colors.black", "AppColors.darkText"),
                token("Colors.grey.shade50", "AppColors.lightGray"),
                token("Colors.grey.shade300", "AppColors.lightGray"),
                token("Colors.grey.shade600", "AppColors.lightText"),
                token("Colors.grey.shade700", "AppColors.lightText"),
                token("Colors.grey.shade800", "AppColors.darkText"),
                token("Colors.grey.shade900", "AppColors.darkText"),
                literal("const Color(0xFFC41D7F)", "AppColors.burgundy"),
                literal("Color(0xFFC41D7F)", "AppColors.burgundy"),
                literal("const Color(0xffC41D7F)", "AppColors.burgundy"),
                literal("Color(0xffC41D7F)", "AppColors.burgundy"),
                literal("const Color(0xFFA01560)", "AppColors.burgundyDark"),
                literal("Color(0xFFA01560)", "AppColors.burgundyDark"),
            ],
            ..Self::new("palette-migration")
        }
    }
}
