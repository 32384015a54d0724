//! Candidate file selection.

use crate::error::{RestyleError, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// The default exclusion marker. Any path containing it is dropped.
pub const DEFAULT_EXCLUSION_MARKER: &str = "test";

/// How a candidate entered the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Matched by a glob pattern during the walk.
    Pattern,
    /// Named explicitly; may not exist.
    Listed,
}

/// A file selected for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub source: CandidateSource,
}

/// Paths handled by an earlier run.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    paths: BTreeSet<PathBuf>,
}

impl ExclusionSet {
    /// Creates an empty exclusion set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a path to the set.
    pub fn insert(&mut self, path: impl AsRef<Path>) {
        self.paths.insert(normalize(path.as_ref()));
    }

    /// Returns true if the path is excluded.
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(&normalize(path))
    }

    /// Returns the number of excluded paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns true if nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<P: AsRef<Path>> FromIterator<P> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = Self::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}

/// Resolves glob patterns and explicit paths into a candidate set.
#[derive(Debug, Clone)]
pub struct FileSelector {
    patterns: Vec<String>,
    files: Vec<PathBuf>,
    exclusion_marker: Option<String>,
    excluded: ExclusionSet,
}

impl Default for FileSelector {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            files: Vec::new(),
            exclusion_marker: Some(DEFAULT_EXCLUSION_MARKER.to_string()),
            excluded: ExclusionSet::new(),
        }
    }
}

impl FileSelector {
    /// Creates a selector with the default exclusion marker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a glob pattern, e.g. `lib/screens/**/*.dart`.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Adds several glob patterns.
    pub fn patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an explicit file path.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Adds several explicit file paths.
    pub fn files(mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Sets the substring that excludes a path, or disables it with `None`.
    ///
    /// Matching is case-sensitive and covers the whole path string, so a
    /// directory named `contest/` excludes everything under it.
    pub fn exclusion_marker(mut self, marker: Option<String>) -> Self {
        self.exclusion_marker = marker.filter(|m| !m.is_empty());
        self
    }

    /// Sets the paths already handled by an earlier run.
    pub fn excluding(mut self, excluded: ExclusionSet) -> Self {
        self.excluded = excluded;
        self
    }

    /// Resolves the candidate set, sorted by path.
    ///
    /// A pattern that matches nothing contributes nothing. A pattern whose
    /// base directory cannot be read fails the whole selection.
    pub fn select(&self) -> Result<Vec<Candidate>> {
        let mut found: BTreeMap<PathBuf, CandidateSource> = BTreeMap::new();

        for path in &self.files {
            found.insert(normalize(path), CandidateSource::Listed);
        }

        for pattern in &self.patterns {
            for path in self.walk_pattern(pattern)? {
                found.insert(path, CandidateSource::Pattern);
            }
        }

        let candidates: Vec<Candidate> = found
            .into_iter()
            .filter(|(path, _)| self.keep(path))
            .map(|(path, source)| Candidate { path, source })
            .collect();

        debug!(count = candidates.len(), "resolved candidate set");
        Ok(candidates)
    }

    fn keep(&self, path: &Path) -> bool {
        if let Some(marker) = &self.exclusion_marker
            && path.to_string_lossy().contains(marker.as_str())
        {
            debug!(path = %path.display(), marker = %marker, "excluded by marker");
            return false;
        }
        if self.excluded.contains(path) {
            debug!(path = %path.display(), "excluded as already migrated");
            return false;
        }
        true
    }

    fn walk_pattern(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern_path = normalize(Path::new(pattern));
        let base = glob_base(&pattern_path);

        // A plain path with no wildcards names a single file.
        if base == pattern_path {
            return Ok(if base.is_file() { vec![base] } else { Vec::new() });
        }

        let metadata = fs::metadata(&base).map_err(|source| RestyleError::PatternRoot {
            pattern: pattern.to_string(),
            path: base.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(RestyleError::PatternRoot {
                pattern: pattern.to_string(),
                path: base,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    "not a directory",
                ),
            });
        }

        let matcher = compile_glob(&pattern_path.to_string_lossy())?;
        let mut matched = Vec::new();

        for entry in WalkDir::new(&base) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(pattern = %pattern, error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = normalize(entry.path());
            if matcher.is_match(&path) {
                matched.push(path);
            }
        }

        debug!(pattern = %pattern, count = matched.len(), "pattern resolved");
        Ok(matched)
    }
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    Ok(GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

/// Returns the leading components of `pattern` that contain no glob syntax.
fn glob_base(pattern: &Path) -> PathBuf {
    let mut base = PathBuf::new();
    for component in pattern.components() {
        let text = component.as_os_str().to_string_lossy();
        if text.contains(['*', '?', '[', '{']) {
            break;
        }
        base.push(component);
    }
    if base.as_os_str().is_empty() {
        base.push(".");
    }
    base
}

/// Drops `.` components so the same file always compares equal.
fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn create_screens(dir: &Path) {
        write(&dir.join("lib/screens/login_screen.dart"), "class Login {}");
        write(&dir.join("lib/screens/booking/flow_screen.dart"), "class Flow {}");
        write(&dir.join("lib/screens/booking/summary.dart"), "class Summary {}");
        write(&dir.join("lib/screens/booking/notes.txt"), "notes");
        write(&dir.join("lib/screens/test_helpers.dart"), "class Helpers {}");
        write(&dir.join("lib/screens/latest/banner.dart"), "class Banner {}");
        write(&dir.join("lib/widgets/menu_card.dart"), "class MenuCard {}");
    }

    fn names(candidates: &[Candidate], root: &Path) -> Vec<String> {
        candidates
            .iter()
            .map(|c| {
                c.path
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn pattern(root: &Path, glob: &str) -> String {
        root.join(glob).to_string_lossy().into_owned()
    }

    #[test]
    fn test_recursive_pattern_is_sorted() {
        let dir = TempDir::new().unwrap();
        create_screens(dir.path());

        let candidates = FileSelector::new()
            .pattern(pattern(dir.path(), "lib/screens/**/*.dart"))
            .select()
            .unwrap();

        assert_eq!(
            names(&candidates, dir.path()),
            vec![
                "lib/screens/booking/flow_screen.dart",
                "lib/screens/booking/summary.dart",
                "lib/screens/login_screen.dart",
            ]
        );
        assert!(
            candidates
                .iter()
                .all(|c| c.source == CandidateSource::Pattern)
        );
    }

    #[test]
    fn test_marker_is_a_substring_match() {
        let dir = TempDir::new().unwrap();
        create_screens(dir.path());

        let candidates = FileSelector::new()
            .pattern(pattern(dir.path(), "lib/**/*.dart"))
            .select()
            .unwrap();

        let names = names(&candidates, dir.path());
        assert!(!names.iter().any(|n| n.contains("test_helpers")));
        // "latest" contains "test"
        assert!(!names.iter().any(|n| n.contains("banner")));
        assert!(names.contains(&"lib/widgets/menu_card.dart".to_string()));
    }

    #[test]
    fn test_marker_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        create_screens(dir.path());

        let candidates = FileSelector::new()
            .pattern(pattern(dir.path(), "lib/screens/**/*.dart"))
            .exclusion_marker(None)
            .select()
            .unwrap();

        assert_eq!(candidates.len(), 5);
    }

    #[test]
    fn test_single_star_does_not_cross_directories() {
        let dir = TempDir::new().unwrap();
        create_screens(dir.path());

        let candidates = FileSelector::new()
            .pattern(pattern(dir.path(), "lib/screens/*.dart"))
            .select()
            .unwrap();

        assert_eq!(
            names(&candidates, dir.path()),
            vec!["lib/screens/login_screen.dart"]
        );
    }

    #[test]
    fn test_exclusion_set() {
        let dir = TempDir::new().unwrap();
        create_screens(dir.path());

        let excluded: ExclusionSet = [dir.path().join("lib/screens/./login_screen.dart")]
            .into_iter()
            .collect();

        let candidates = FileSelector::new()
            .pattern(pattern(dir.path(), "lib/screens/**/*.dart"))
            .excluding(excluded)
            .select()
            .unwrap();

        let names = names(&candidates, dir.path());
        assert_eq!(names.len(), 2);
        assert!(!names.contains(&"lib/screens/login_screen.dart".to_string()));
    }

    #[test]
    fn test_overlapping_patterns_are_deduplicated() {
        let dir = TempDir::new().unwrap();
        create_screens(dir.path());

        let candidates = FileSelector::new()
            .pattern(pattern(dir.path(), "lib/screens/**/*.dart"))
            .pattern(pattern(dir.path(), "lib/screens/booking/*.dart"))
            .select()
            .unwrap();

        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_pattern_without_matches_is_empty() {
        let dir = TempDir::new().unwrap();
        create_screens(dir.path());

        let candidates = FileSelector::new()
            .pattern(pattern(dir.path(), "lib/**/*.kt"))
            .select()
            .unwrap();

        assert!(candidates.is_empty());
    }

    #[test]
    fn test_missing_pattern_root_fails() {
        let dir = TempDir::new().unwrap();

        let result = FileSelector::new()
            .pattern(pattern(dir.path(), "missing/**/*.dart"))
            .select();

        assert!(matches!(result, Err(RestyleError::PatternRoot { .. })));
    }

    #[test]
    fn test_listed_files() {
        let dir = TempDir::new().unwrap();
        create_screens(dir.path());

        let candidates = FileSelector::new()
            .file(dir.path().join("lib/widgets/menu_card.dart"))
            .file(dir.path().join("lib/widgets/gone.dart"))
            .file(dir.path().join("lib/screens/test_helpers.dart"))
            .select()
            .unwrap();

        assert_eq!(
            names(&candidates, dir.path()),
            vec!["lib/widgets/gone.dart", "lib/widgets/menu_card.dart"]
        );
        assert!(
            candidates
                .iter()
                .all(|c| c.source == CandidateSource::Listed)
        );
    }

    #[test]
    fn test_pattern_wins_over_listing() {
        let dir = TempDir::new().unwrap();
        create_screens(dir.path());

        let candidates = FileSelector::new()
            .file(dir.path().join("lib/widgets/menu_card.dart"))
            .pattern(pattern(dir.path(), "lib/widgets/*.dart"))
            .select()
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source, CandidateSource::Pattern);
    }

    #[test]
    fn test_glob_base() {
        assert_eq!(
            glob_base(Path::new("/app/lib/screens/**/*.dart")),
            PathBuf::from("/app/lib/screens")
        );
        assert_eq!(glob_base(Path::new("*.dart")), PathBuf::from("."));
        assert_eq!(
            glob_base(Path::new("lib/main.dart")),
            PathBuf::from("lib/main.dart")
        );
    }
}
