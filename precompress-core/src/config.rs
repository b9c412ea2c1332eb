//! Configuration for the precompression step

use crate::{CompressionOptions, FileFilter};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default algorithm identifier
pub const DEFAULT_ALGORITHM: &str = "gzip";

/// Default minimum file size, in bytes
pub const DEFAULT_THRESHOLD: u64 = 1025;

/// Callback invoked once after a run has been reported
pub type SuccessCallback = Arc<dyn Fn() + Send + Sync>;

/// Configuration for a precompression run.
///
/// Resolved once and immutable for the lifetime of a plugin.
#[derive(Clone)]
pub struct PrecompressConfig {
    /// Register the hook but never do any work
    pub disable: bool,

    /// Which output files are candidates
    pub filter: FileFilter,

    /// Print a per-file summary after each run (default: true)
    pub verbose: bool,

    /// Minimum original size in bytes (default: 1025)
    pub threshold: u64,

    /// Overrides merged into the algorithm defaults
    pub compression_options: CompressionOptions,

    /// Remove the uncompressed file once its contents are read
    pub delete_origin_file: bool,

    /// Called once after reporting
    pub success: Option<SuccessCallback>,

    /// Output suffix, as supplied or derived from the algorithm
    pub ext: String,

    /// Algorithm identifier (default: `gzip`)
    pub algorithm: String,
}

impl Default for PrecompressConfig {
    fn default() -> Self {
        PrecompressConfigBuilder::new().build()
    }
}

impl PrecompressConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for configuration
    pub fn builder() -> PrecompressConfigBuilder {
        PrecompressConfigBuilder::new()
    }

    /// Suffix appended to every output file, always starting with `.`
    pub fn output_extension(&self) -> String {
        normalize_extension(&self.ext)
    }

    /// Where the compressed companion of `path` is written
    pub fn output_path(&self, path: &Path) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(self.output_extension());
        PathBuf::from(name)
    }
}

impl fmt::Debug for PrecompressConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrecompressConfig")
            .field("disable", &self.disable)
            .field("filter", &self.filter)
            .field("verbose", &self.verbose)
            .field("threshold", &self.threshold)
            .field("compression_options", &self.compression_options)
            .field("delete_origin_file", &self.delete_origin_file)
            .field("success", &self.success.as_ref().map(|_| "<fn>"))
            .field("ext", &self.ext)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Builder for PrecompressConfig
#[derive(Clone, Default)]
pub struct PrecompressConfigBuilder {
    disable: bool,
    filter: Option<FileFilter>,
    verbose: Option<bool>,
    threshold: Option<u64>,
    compression_options: CompressionOptions,
    delete_origin_file: bool,
    success: Option<SuccessCallback>,
    ext: Option<String>,
    algorithm: Option<String>,
}

impl PrecompressConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the hook inert
    pub fn disable(mut self, disable: bool) -> Self {
        self.disable = disable;
        self
    }

    /// Set the eligibility filter
    pub fn filter(mut self, filter: FileFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set whether a summary is printed
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set the minimum original size in bytes
    pub fn threshold(mut self, threshold: u64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the raw option overrides
    pub fn compression_options(mut self, options: CompressionOptions) -> Self {
        self.compression_options = options;
        self
    }

    /// Remove originals after reading them
    pub fn delete_origin_file(mut self, delete: bool) -> Self {
        self.delete_origin_file = delete;
        self
    }

    /// Set the completion callback
    pub fn success<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.success = Some(Arc::new(callback));
        self
    }

    /// Set the output suffix; a missing leading `.` is added later
    pub fn ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }

    /// Set the algorithm identifier
    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Use gzip compression
    pub fn gzip(self) -> Self {
        self.algorithm("gzip")
    }

    /// Use brotli compression
    pub fn brotli(self) -> Self {
        self.algorithm("brotliCompress")
    }

    /// Build the configuration
    pub fn build(self) -> PrecompressConfig {
        let algorithm = self
            .algorithm
            .unwrap_or_else(|| DEFAULT_ALGORITHM.to_string());
        let ext = match self.ext {
            Some(ext) if !ext.is_empty() => ext,
            _ => default_extension(&algorithm).unwrap_or_default().to_string(),
        };

        PrecompressConfig {
            disable: self.disable,
            filter: self.filter.unwrap_or_default(),
            verbose: self.verbose.unwrap_or(true),
            threshold: self.threshold.unwrap_or(DEFAULT_THRESHOLD),
            compression_options: self.compression_options,
            delete_origin_file: self.delete_origin_file,
            success: self.success,
            ext,
            algorithm,
        }
    }
}

/// Output suffix implied by an algorithm, if it has a conventional one
pub fn default_extension(algorithm: &str) -> Option<&'static str> {
    match algorithm {
        "gzip" => Some(".gz"),
        "brotliCompress" => Some(".br"),
        _ => None,
    }
}

/// Force a leading `.` onto `ext`
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PrecompressConfig::default();
        assert!(!config.disable);
        assert!(config.verbose);
        assert_eq!(config.threshold, 1025);
        assert_eq!(config.algorithm, "gzip");
        assert_eq!(config.ext, ".gz");
        assert!(!config.delete_origin_file);
        assert!(config.success.is_none());
        assert!(config.compression_options.is_empty());
    }

    #[test]
    fn test_builder() {
        let config = PrecompressConfig::builder()
            .threshold(0)
            .verbose(false)
            .delete_origin_file(true)
            .build();

        assert_eq!(config.threshold, 0);
        assert!(!config.verbose);
        assert!(config.delete_origin_file);
    }

    #[test]
    fn test_extension_follows_algorithm() {
        assert_eq!(PrecompressConfig::builder().brotli().build().ext, ".br");
        assert_eq!(PrecompressConfig::builder().gzip().build().ext, ".gz");

        // No conventional suffix for the other algorithms
        assert_eq!(PrecompressConfig::builder().algorithm("deflate").build().ext, "");

        // Explicit suffix wins
        let config = PrecompressConfig::builder().brotli().ext(".brotli").build();
        assert_eq!(config.ext, ".brotli");

        // Empty suffix counts as unset
        let config = PrecompressConfig::builder().brotli().ext("").build();
        assert_eq!(config.ext, ".br");
    }

    #[test]
    fn test_extension_normalization() {
        let dotted = PrecompressConfig::builder().ext(".gz").build();
        let bare = PrecompressConfig::builder().ext("gz").build();
        let path = Path::new("/dist/assets/app.js");

        assert_eq!(dotted.output_path(path), PathBuf::from("/dist/assets/app.js.gz"));
        assert_eq!(bare.output_path(path), dotted.output_path(path));
    }

    #[test]
    fn test_debug_hides_callback() {
        let config = PrecompressConfig::builder().success(|| {}).build();
        let debug = format!("{:?}", config);
        assert!(debug.contains("success: Some(\"<fn>\")"));
    }
}
