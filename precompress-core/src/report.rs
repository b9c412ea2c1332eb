//! Run results and the size summary

use crate::Logger;
use std::path::{Path, PathBuf};

/// A file that passed the filter and is about to be checked against the
/// change cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionTask {
    pub file_path: PathBuf,
    /// Size on disk in bytes
    pub original_size: u64,
    /// Modification time, milliseconds since the Unix epoch
    pub mtime: i64,
}

/// Outcome of compressing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    /// The original file
    pub source_path: PathBuf,
    /// The companion file that was written
    pub output_path: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
}

impl CompressionResult {
    pub fn original_size_kb(&self) -> f64 {
        self.original_size as f64 / 1024.0
    }

    pub fn compressed_size_kb(&self) -> f64 {
        self.compressed_size as f64 / 1024.0
    }

    /// Bytes saved; negative when the output grew
    pub fn saved_bytes(&self) -> i64 {
        self.original_size as i64 - self.compressed_size as i64
    }
}

/// A file whose processing failed; it is retried on the next run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Everything one run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Files found under the output directory
    pub collected: usize,
    /// Files that passed the eligibility filter
    pub eligible: usize,
    /// Eligible files left alone by the threshold or the change cache
    pub skipped: usize,
    /// Compressed files, in discovery order
    pub results: Vec<CompressionResult>,
    pub failures: Vec<FileFailure>,
}

impl RunReport {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn total_original_size(&self) -> u64 {
        self.results.iter().map(|r| r.original_size).sum()
    }

    pub fn total_compressed_size(&self) -> u64 {
        self.results.iter().map(|r| r.compressed_size).sum()
    }

    /// Result for a given original path
    pub fn result_for(&self, source: &Path) -> Option<&CompressionResult> {
        self.results.iter().find(|r| r.source_path == source)
    }
}

/// Format the summary block printed after a run.
///
/// Output paths are shown relative to `out_dir` and prefixed with its last
/// component; the size column is aligned on the longest source path.
pub fn format_summary(out_dir: &Path, algorithm: &str, results: &[CompressionResult]) -> Vec<String> {
    let mut lines = Vec::with_capacity(results.len() + 2);
    lines.push(format!(
        "\n✨ [precompress]:algorithm={} - compressed file successfully: ",
        algorithm
    ));

    let dir_name = out_dir
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let max_key = results
        .iter()
        .map(|r| display_path(&r.source_path).chars().count())
        .max()
        .unwrap_or(0);

    for result in results {
        let key_len = display_path(&result.source_path).chars().count();
        let relative = result
            .output_path
            .strip_prefix(out_dir)
            .unwrap_or(&result.output_path);

        lines.push(format!(
            "{}/{}{} {:.2}kb / {}: {:.2}kb",
            dir_name,
            display_path(relative),
            " ".repeat(2 + max_key - key_len),
            result.original_size_kb(),
            algorithm,
            result.compressed_size_kb(),
        ));
    }

    lines.push(String::new());
    lines
}

/// Emit the summary through the host logger
pub fn report(logger: &dyn Logger, out_dir: &Path, algorithm: &str, results: &[CompressionResult]) {
    for line in format_summary(out_dir, algorithm, results) {
        logger.info(&line);
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
