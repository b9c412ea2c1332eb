//! Integration tests for precompress-core

#![cfg(all(feature = "gzip", feature = "brotli"))]

use precompress_core::*;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn stylesheet(len: usize) -> Vec<u8> {
    let rule = ".button { color: #333; padding: 4px 8px; }\n";
    rule.repeat(len / rule.len() + 1).into_bytes()[..len].to_vec()
}

fn plugin_for(dir: &Path, config: PrecompressConfig) -> (CompressionPlugin, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let mut plugin = CompressionPlugin::new(config);
    plugin.config_resolved(&BuildConfig::new(dir, "dist").with_logger(logger.clone()));
    (plugin, logger)
}

fn dist(dir: &TempDir) -> std::path::PathBuf {
    let dist = dir.path().join("dist");
    fs::create_dir_all(dist.join("assets")).unwrap();
    dist
}

#[tokio::test]
async fn test_gzip_output_decompresses_to_original() {
    let dir = TempDir::new().unwrap();
    let dist = dist(&dir);
    let original = stylesheet(8000);
    fs::write(dist.join("assets/site.css"), &original).unwrap();

    let (plugin, _) = plugin_for(dir.path(), PrecompressConfig::default());
    let report = plugin.close_bundle().await.unwrap();
    assert_eq!(report.results.len(), 1);

    let compressed = fs::read(dist.join("assets/site.css.gz")).unwrap();
    assert!(compressed.len() < original.len());

    let mut decoded = Vec::new();
    flate2::read::GzDecoder::new(&compressed[..])
        .read_to_end(&mut decoded)
        .unwrap();
    assert_eq!(decoded, original);
}

#[tokio::test]
async fn test_brotli_output_decompresses_to_original() {
    let dir = TempDir::new().unwrap();
    let dist = dist(&dir);
    let original = stylesheet(8000);
    fs::write(dist.join("index.html"), &original).unwrap();

    let (plugin, _) = plugin_for(dir.path(), PrecompressConfig::builder().brotli().build());
    plugin.close_bundle().await.unwrap();

    let compressed = fs::read(dist.join("index.html.br")).unwrap();
    let mut decoded = Vec::new();
    brotli::BrotliDecompress(&mut std::io::Cursor::new(&compressed), &mut decoded).unwrap();
    assert_eq!(decoded, original);
}

#[tokio::test]
async fn test_extension_without_dot() {
    let dir = TempDir::new().unwrap();
    let dist = dist(&dir);
    fs::write(dist.join("app.js"), stylesheet(2000)).unwrap();

    let (plugin, _) = plugin_for(
        dir.path(),
        PrecompressConfig::builder().algorithm("deflate").ext("zz").build(),
    );
    let report = plugin.close_bundle().await.unwrap();

    assert_eq!(report.results[0].output_path, dist.join("app.js.zz"));
    assert!(dist.join("app.js.zz").exists());
}

#[tokio::test]
async fn test_sibling_files_survive_one_failure() {
    let dir = TempDir::new().unwrap();
    let dist = dist(&dir);
    fs::write(dist.join("app.js"), stylesheet(3000)).unwrap();
    fs::write(dist.join("assets/site.css"), stylesheet(3000)).unwrap();
    // Dangling symlink: collected and filtered in, but cannot be read
    #[cfg(unix)]
    std::os::unix::fs::symlink(dist.join("missing.js"), dist.join("broken.js")).unwrap();

    let (plugin, logger) = plugin_for(dir.path(), PrecompressConfig::default());
    let report = plugin.close_bundle().await.unwrap();

    assert_eq!(report.results.len(), 2);
    assert!(dist.join("app.js.gz").exists());
    assert!(dist.join("assets/site.css.gz").exists());

    #[cfg(unix)]
    {
        assert_eq!(report.failures.len(), 1);
        assert_eq!(logger.messages(LogLevel::Error).len(), 1);
        assert!(!plugin.cache().contains(&dist.join("broken.js")));
    }
    #[cfg(not(unix))]
    let _ = logger;
}

#[tokio::test]
async fn test_custom_threshold_and_filter() {
    let dir = TempDir::new().unwrap();
    let dist = dist(&dir);
    fs::write(dist.join("data.txt"), stylesheet(100)).unwrap();
    fs::write(dist.join("app.js"), stylesheet(100)).unwrap();

    let config = PrecompressConfig::builder()
        .threshold(0)
        .filter(FileFilter::predicate(|p| {
            p.extension().is_some_and(|e| e == "txt")
        }))
        .build();
    let (plugin, _) = plugin_for(dir.path(), config);
    let report = plugin.close_bundle().await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert!(dist.join("data.txt.gz").exists());
    assert!(!dist.join("app.js.gz").exists());
}

/// Bytes that deflate cannot shrink, so `.gz` outputs stay above the threshold.
fn noise(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

#[tokio::test]
async fn test_outputs_excluded_from_catch_all_filter() {
    let dir = TempDir::new().unwrap();
    let dist = dist(&dir);
    fs::write(dist.join("app.js"), noise(8000)).unwrap();

    let config = PrecompressConfig::builder()
        .filter(FileFilter::all_except_suffix(".gz"))
        .build();
    let (plugin, _) = plugin_for(dir.path(), config);
    plugin.close_bundle().await.unwrap();
    assert!(fs::metadata(dist.join("app.js.gz")).unwrap().len() > DEFAULT_THRESHOLD);

    let report = plugin.close_bundle().await.unwrap();
    assert_eq!(report.eligible, 1);
    assert!(report.results.is_empty());
    assert!(!dist.join("app.js.gz.gz").exists());
}

#[tokio::test]
async fn test_default_filter_ignores_outputs() {
    let dir = TempDir::new().unwrap();
    let dist = dist(&dir);
    fs::write(dist.join("app.js"), noise(8000)).unwrap();

    let (plugin, _) = plugin_for(dir.path(), PrecompressConfig::default());
    plugin.close_bundle().await.unwrap();

    let report = plugin.close_bundle().await.unwrap();
    assert_eq!(report.collected, 2);
    assert_eq!(report.eligible, 1);
    assert!(!dist.join("app.js.gz.gz").exists());
}

#[tokio::test]
async fn test_summary_names_output_relative_to_dist() {
    let dir = TempDir::new().unwrap();
    let dist = dist(&dir);
    fs::write(dist.join("assets/site.css"), stylesheet(4096)).unwrap();

    let (plugin, logger) = plugin_for(dir.path(), PrecompressConfig::default());
    plugin.close_bundle().await.unwrap();

    let info = logger.messages(LogLevel::Info);
    assert!(info[0].contains("algorithm=gzip"));
    assert!(info[1].starts_with("dist/assets/site.css.gz"));
    assert!(info[1].contains("4.00kb / gzip:"));
}
