//! One precompression run over a build output directory

use crate::report::{self as summary, CompressionResult, CompressionTask, FileFailure, RunReport};
use crate::{
    ChangeCache, CompressionError, Logger, PrecompressConfig, Result, collect_files, engine,
    resolve_options,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::path::Path;
use tokio::fs;

enum FileOutcome {
    Skipped,
    Compressed(CompressionResult),
    Failed(FileFailure),
}

/// Run the pipeline once over `out_dir`.
///
/// Every eligible file is processed concurrently on the calling task; a
/// failure on one file is logged and never affects its siblings. Only a
/// failure to walk `out_dir` is returned as an error.
///
/// When nothing is found under `out_dir` the run returns straight away,
/// without a summary and without calling the success callback.
///
/// An empty `ext` is rejected before anything is touched: algorithms
/// without a conventional suffix need one supplied, or every output would
/// be written as `<file>.`.
pub async fn run(
    out_dir: &Path,
    config: &PrecompressConfig,
    cache: &ChangeCache,
    logger: &dyn Logger,
) -> Result<RunReport> {
    if config.ext.trim_start_matches('.').is_empty() {
        return Err(CompressionError::Config(format!(
            "no output extension for algorithm `{}`; set `ext`",
            config.algorithm
        )));
    }

    let files = collect_files(out_dir)?;
    if files.is_empty() {
        return Ok(RunReport::default());
    }

    let collected = files.len();
    let files = config.filter.apply(files);
    tracing::debug!(collected, eligible = files.len(), dir = %out_dir.display(), "collected output files");

    let options = resolve_options(&config.algorithm, &config.compression_options);

    let outcomes = join_all(files.iter().map(|path| {
        let options = &options;
        async move {
            match process_file(path, config, options, cache).await {
                Ok(Some(result)) => FileOutcome::Compressed(result),
                Ok(None) => FileOutcome::Skipped,
                Err(e) => {
                    logger.error(&format!("compress error: {}: {}", path.display(), e));
                    FileOutcome::Failed(FileFailure {
                        path: path.clone(),
                        error: e.to_string(),
                    })
                }
            }
        }
    }))
    .await;

    let mut report = RunReport {
        collected,
        eligible: files.len(),
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            FileOutcome::Skipped => report.skipped += 1,
            FileOutcome::Compressed(result) => report.results.push(result),
            FileOutcome::Failed(failure) => report.failures.push(failure),
        }
    }

    if config.verbose && !report.results.is_empty() {
        summary::report(logger, out_dir, &config.algorithm, &report.results);
        if let Some(success) = &config.success {
            success();
        }
    }

    Ok(report)
}

async fn stat(path: &Path) -> Result<CompressionTask> {
    let metadata = fs::metadata(path).await?;
    let mtime = DateTime::<Utc>::from(metadata.modified()?).timestamp_millis();

    Ok(CompressionTask {
        file_path: path.to_path_buf(),
        original_size: metadata.len(),
        mtime,
    })
}

async fn process_file(
    path: &Path,
    config: &PrecompressConfig,
    options: &crate::CompressionOptions,
    cache: &ChangeCache,
) -> Result<Option<CompressionResult>> {
    let task = stat(path).await?;
    if !cache.should_process(&task.file_path, task.mtime, task.original_size, config.threshold) {
        tracing::debug!(path = %path.display(), "unchanged or below threshold, skipping");
        return Ok(None);
    }

    let content = fs::read(path).await?;

    // The original goes away while the encoder runs; its bytes are
    // already in memory.
    let compressed = if config.delete_origin_file {
        let (_, compressed) = tokio::join!(
            remove_original(path),
            engine::compress(content, &config.algorithm, options)
        );
        compressed?
    } else {
        engine::compress(content, &config.algorithm, options).await?
    };

    let output_path = config.output_path(path);
    fs::write(&output_path, &compressed).await?;
    cache.record(&task.file_path, Utc::now().timestamp_millis());

    Ok(Some(CompressionResult {
        source_path: task.file_path,
        output_path,
        original_size: task.original_size,
        compressed_size: compressed.len() as u64,
    }))
}

async fn remove_original(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        tracing::debug!(path = %path.display(), error = %e, "could not remove original file");
    }
}
