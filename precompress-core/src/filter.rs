//! Eligibility filtering

use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pattern matched by the default filter: common text, script, style and
/// markup outputs.
pub const DEFAULT_FILTER_PATTERN: &str = r"(?i)\.(js|mjs|json|css|html)$";

/// Predicate form of a filter
pub type FilterFn = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Which collected files are candidates for compression.
#[derive(Clone)]
pub enum FileFilter {
    /// Keep paths whose string form matches the pattern
    Pattern(Regex),
    /// Keep paths the predicate accepts
    Predicate(FilterFn),
    /// Keep everything
    All,
}

impl FileFilter {
    /// Build a pattern filter from a regex source string
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Pattern)
    }

    /// Build a predicate filter
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// Keep everything except paths ending in `suffix`.
    ///
    /// Use this instead of [`FileFilter::All`] when outputs land in the same
    /// tree, so a later run does not compress `app.js.gz` into `app.js.gz.gz`.
    pub fn all_except_suffix(suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        Self::predicate(move |path| !path.to_string_lossy().ends_with(suffix.as_str()))
    }

    /// Check a single path
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Self::Pattern(re) => re.is_match(&path.to_string_lossy()),
            Self::Predicate(f) => f(path),
            Self::All => true,
        }
    }

    /// Narrow `files` to the eligible subset, preserving order
    pub fn apply(&self, files: Vec<PathBuf>) -> Vec<PathBuf> {
        match self {
            Self::All => files,
            _ => files.into_iter().filter(|p| self.matches(p)).collect(),
        }
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::Pattern(Regex::new(DEFAULT_FILTER_PATTERN).expect("default filter pattern is valid"))
    }
}

impl fmt::Debug for FileFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
            Self::All => f.write_str("All"),
        }
    }
}

impl From<Regex> for FileFilter {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}
