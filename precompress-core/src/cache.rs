//! Change detection across runs

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Last successful compression time per source file, in milliseconds since
/// the Unix epoch.
///
/// One instance is meant to live as long as the host process and be shared
/// by every run (`Arc<ChangeCache>`). Entries are keyed by the original
/// file path, never the compressed output. There is no eviction.
#[derive(Debug, Default)]
pub struct ChangeCache {
    entries: RwLock<HashMap<PathBuf, i64>>,
}

impl ChangeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp recorded for `path`, or 0 if it was never compressed.
    pub fn last_recorded(&self, path: &Path) -> i64 {
        self.entries.read().get(path).copied().unwrap_or(0)
    }

    /// Whether a file with this `mtime` and `size` needs compressing.
    ///
    /// Files under `threshold` bytes are never processed; otherwise the file
    /// must have been modified after its last recorded compression.
    pub fn should_process(&self, path: &Path, mtime: i64, size: u64, threshold: u64) -> bool {
        if size < threshold {
            return false;
        }
        mtime > self.last_recorded(path)
    }

    /// Upsert the entry for `path`
    pub fn record(&self, path: impl Into<PathBuf>, timestamp: i64) {
        self.entries.write().insert(path.into(), timestamp);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.read().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        let cache = ChangeCache::new();
        let path = Path::new("/dist/app.js");

        assert!(!cache.should_process(path, 1_000, 1024, 1025));
        assert!(cache.should_process(path, 1_000, 1025, 1025));
        assert!(cache.should_process(path, 1_000, 4096, 1025));
    }

    #[test]
    fn test_unrecorded_path_defaults_to_zero() {
        let cache = ChangeCache::new();
        let path = Path::new("/dist/app.js");

        assert_eq!(cache.last_recorded(path), 0);
        assert!(cache.should_process(path, 1, 2000, 0));
        assert!(!cache.should_process(path, 0, 2000, 0));
    }

    #[test]
    fn test_mtime_must_exceed_recorded() {
        let cache = ChangeCache::new();
        let path = Path::new("/dist/app.js");
        cache.record(path, 5_000);

        assert!(!cache.should_process(path, 4_000, 2000, 1025));
        assert!(!cache.should_process(path, 5_000, 2000, 1025));
        assert!(cache.should_process(path, 5_001, 2000, 1025));
    }

    #[test]
    fn test_record_upserts() {
        let cache = ChangeCache::new();
        let path = PathBuf::from("/dist/app.js");

        cache.record(&path, 10);
        cache.record(&path, 20);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.last_recorded(&path), 20);
        assert!(cache.contains(&path));
        assert!(!cache.contains(Path::new("/dist/app.js.gz")));
    }
}
