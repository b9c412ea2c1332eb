//! Post-build asset precompression
//!
//! After a bundler writes its output directory, this crate walks it, picks
//! the files worth compressing, and writes a compressed companion next to
//! each one (`app.js` → `app.js.gz`), so a static file server can hand out
//! pre-encoded responses without compressing on the fly.
//!
//! # Features
//!
//! - `gzip` - Enable gzip, deflate and raw deflate (enabled by default)
//! - `brotli` - Enable brotli compression (enabled by default)
//! - `zstd` - Enable zstd compression
//! - `full` - Enable all compression algorithms
//!
//! # Example
//!
//! ```rust,no_run
//! use precompress_core::{BuildConfig, BuildPlugin, CompressionPlugin, PrecompressConfig};
//!
//! # async fn build() -> precompress_core::Result<()> {
//! let config = PrecompressConfig::builder()
//!     .brotli()
//!     .threshold(1024)  // Skip files smaller than 1KB
//!     .build();
//!
//! let mut plugin = CompressionPlugin::new(config);
//! plugin.config_resolved(&BuildConfig::new(".", "dist"));
//! plugin.close_bundle().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Incremental builds
//!
//! A [`ChangeCache`] remembers when each file was last compressed. Files
//! whose modification time has not moved past that point are skipped, so a
//! long-running watch session only recompresses what a rebuild touched.
//! Failed files are never recorded and are retried on the next run.

mod algorithm;
mod cache;
mod collector;
mod config;
mod engine;
mod error;
mod filter;
mod logger;
mod options;
mod orchestrator;
mod plugin;
mod report;

pub use algorithm::{BrotliMode, CompressionAlgorithm, EncoderSettings};
pub use cache::ChangeCache;
pub use collector::collect_files;
pub use config::{
    DEFAULT_ALGORITHM, DEFAULT_THRESHOLD, PrecompressConfig, PrecompressConfigBuilder,
    SuccessCallback, default_extension, normalize_extension,
};
pub use engine::compress;
pub use error::CompressionError;
pub use filter::{DEFAULT_FILTER_PATTERN, FileFilter, FilterFn};
pub use logger::{LogLevel, Logger, MemoryLogger, TracingLogger};
pub use options::{CompressionOptions, resolve_options};
pub use orchestrator::run;
pub use plugin::{BuildConfig, BuildPlugin, CompressionPlugin};
pub use report::{
    CompressionResult, CompressionTask, FileFailure, RunReport, format_summary, report,
};

/// Result type for compression operations
pub type Result<T> = std::result::Result<T, CompressionError>;
