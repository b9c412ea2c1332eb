//! Algorithm option resolution

use crate::CompressionAlgorithm;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw tuning options handed to the compression engine.
///
/// Kept as an untyped map so overrides can be merged key-by-key before the
/// engine interprets them for a concrete algorithm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompressionOptions(Map<String, Value>);

impl CompressionOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a top-level key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Shallow merge: every top-level key in `overrides` replaces ours
    /// wholesale, nested objects included.
    pub fn merged_with(mut self, overrides: &CompressionOptions) -> Self {
        for (key, value) in &overrides.0 {
            self.0.insert(key.clone(), value.clone());
        }
        self
    }
}

impl From<Map<String, Value>> for CompressionOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for CompressionOptions {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Resolve the options for `algorithm`: built-in defaults with `overrides`
/// merged on top.
///
/// Unknown identifiers resolve to the overrides alone; the engine reports
/// them when it is asked to compress.
pub fn resolve_options(algorithm: &str, overrides: &CompressionOptions) -> CompressionOptions {
    let defaults = algorithm
        .parse::<CompressionAlgorithm>()
        .map(|algorithm| algorithm.default_options())
        .unwrap_or_default();

    defaults.merged_with(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[cfg(feature = "gzip")]
    #[test]
    fn test_stream_defaults_use_max_level() {
        for id in ["gzip", "deflate", "deflateRaw"] {
            let options = resolve_options(id, &CompressionOptions::new());
            assert_eq!(options.get("level"), Some(&json!(9)), "{}", id);
            assert_eq!(options.len(), 1);
        }
    }

    #[cfg(feature = "brotli")]
    #[test]
    fn test_brotli_defaults() {
        let options = resolve_options("brotliCompress", &CompressionOptions::new());
        assert_eq!(
            options.get("params"),
            Some(&json!({ "quality": 11, "mode": "text" }))
        );
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn test_overrides_win() {
        let overrides = CompressionOptions::new().with("level", 1).with("memLevel", 8);
        let options = resolve_options("gzip", &overrides);

        assert_eq!(options.get("level"), Some(&json!(1)));
        assert_eq!(options.get("memLevel"), Some(&json!(8)));
    }

    #[cfg(feature = "brotli")]
    #[test]
    fn test_merge_is_shallow() {
        // Overriding `params` replaces the whole nested object
        let overrides = CompressionOptions::new().with("params", json!({ "quality": 4 }));
        let options = resolve_options("brotliCompress", &overrides);

        assert_eq!(options.get("params"), Some(&json!({ "quality": 4 })));
    }

    #[test]
    fn test_unknown_algorithm_passes_overrides_through() {
        let options = resolve_options("lzma", &CompressionOptions::new());
        assert!(options.is_empty());

        let overrides = CompressionOptions::new().with("preset", 6);
        assert_eq!(resolve_options("lzma", &overrides), overrides);
    }

    #[test]
    fn test_deserialize_from_json() {
        let options: CompressionOptions =
            serde_json::from_value(json!({ "level": 3, "params": { "mode": "font" } })).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options.get("level"), Some(&json!(3)));
    }
}
