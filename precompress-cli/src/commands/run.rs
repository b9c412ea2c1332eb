//! One-shot compression of a build output directory.

use colored::Colorize;
use precompress_core::{BuildConfig, BuildPlugin, ChangeCache, CompressionPlugin, RunReport};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::CompressArgs;
use crate::console::ConsoleLogger;
use crate::error::CliResult;
use crate::settings::{self, FileSettings};

/// Compress everything eligible under `args.dir` once.
pub async fn run(args: &CompressArgs) -> CliResult<()> {
    let start = Instant::now();
    let plugin = prepare(args, Arc::new(ChangeCache::new()))?;

    let report = plugin.close_bundle().await?;
    summarize(&report, start.elapsed(), args.quiet);

    Ok(())
}

/// Resolve settings and hand the plugin its build configuration, the way a
/// bundler would before its first build.
pub(crate) fn prepare(args: &CompressArgs, cache: Arc<ChangeCache>) -> CliResult<CompressionPlugin> {
    let cwd = std::env::current_dir()?;
    let file_settings = FileSettings::discover(args.config.as_deref(), &cwd)?;

    let mut config = settings::resolve(file_settings, args)?;
    config.success = Some(Arc::new(|| {
        println!("  {} Precompression complete", "✓".green().bold());
    }));

    let mut plugin = CompressionPlugin::with_cache(config, cache);
    plugin.config_resolved(&BuildConfig::new(cwd, &args.dir).with_logger(Arc::new(ConsoleLogger)));

    tracing::debug!(?plugin, "plugin ready");
    Ok(plugin)
}

/// One-line totals after a run, plus a warning when files failed.
pub(crate) fn summarize(report: &RunReport, elapsed: Duration, quiet: bool) {
    if !report.failures.is_empty() {
        eprintln!(
            "  {} {} file(s) failed and will be retried on the next run",
            "⚠".yellow(),
            report.failures.len()
        );
    }

    if quiet {
        return;
    }

    if report.results.is_empty() {
        println!(
            "  {} Nothing to compress ({} skipped)",
            "→".dimmed(),
            report.skipped
        );
        return;
    }

    println!(
        "  {} {} file(s): {:.2}kb → {:.2}kb in {:.2}s",
        "→".green(),
        report.results.len(),
        report.total_original_size() as f64 / 1024.0,
        report.total_compressed_size() as f64 / 1024.0,
        elapsed.as_secs_f64()
    );
}
