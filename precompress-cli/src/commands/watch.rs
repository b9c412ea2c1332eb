//! Long-lived watch session: recompress whenever the output directory changes.

use colored::Colorize;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, new_debouncer};
use precompress_core::{BuildPlugin, ChangeCache};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use super::run::{prepare, summarize};
use crate::WatchArgs;
use crate::error::{CliError, CliResult};

/// Run once, then again after every debounced batch of changes until
/// Ctrl+C. All runs share one change cache, so only touched files are
/// recompressed.
pub async fn run(args: &WatchArgs) -> CliResult<()> {
    let cache = Arc::new(ChangeCache::new());
    let plugin = prepare(&args.compress, cache.clone())?;
    let out_dir = plugin
        .out_dir()
        .cloned()
        .ok_or_else(|| CliError::Watch("output directory was not resolved".to_string()))?;
    let output_ext = plugin.config().output_extension();

    // The watcher needs something to attach to before the first build lands
    std::fs::create_dir_all(&out_dir)?;

    println!();
    println!(
        "  {} Watching {} for changes",
        "→".green(),
        out_dir.display().to_string().bold()
    );
    println!("  {} Press {} to stop", "→".dimmed(), "Ctrl+C".yellow());
    println!();

    run_once(&plugin, args.compress.quiet).await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handler = move |result: DebounceEventResult| {
        let _ = tx.send(result);
    };
    let mut debouncer = new_debouncer(Duration::from_millis(args.debounce_ms), handler)
        .map_err(|e| CliError::Watch(e.to_string()))?;

    debouncer
        .watcher()
        .watch(&out_dir, RecursiveMode::Recursive)?;

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(Ok(events)) => {
                    let paths: Vec<PathBuf> = events.into_iter().map(|e| e.path).collect();
                    if !is_relevant(&paths, &output_ext) {
                        continue;
                    }
                    println!("  {} Output changed, compressing...", "↻".yellow().bold());
                    rerun(&plugin, args.compress.quiet).await;
                }
                Some(Err(e)) => {
                    eprintln!("  {} Watch error: {}", "⚠".yellow(), e);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!();
    println!(
        "  {} Shutting down ({} file(s) tracked)",
        "→".yellow(),
        cache.len()
    );

    Ok(())
}

async fn run_once(plugin: &impl BuildPlugin, quiet: bool) -> CliResult<()> {
    let start = Instant::now();
    let report = plugin.close_bundle().await?;
    summarize(&report, start.elapsed(), quiet);
    Ok(())
}

/// Run after a change batch. Failures are reported and the session goes on;
/// a rebuild can remove directories mid-walk and the next batch retries.
async fn rerun(plugin: &impl BuildPlugin, quiet: bool) -> bool {
    match run_once(plugin, quiet).await {
        Ok(()) => true,
        Err(e) => {
            eprintln!("  {} Run failed: {}", "⚠".yellow(), e);
            false
        }
    }
}

/// A batch matters unless every path in it is one of our own outputs.
fn is_relevant(paths: &[PathBuf], output_ext: &str) -> bool {
    !paths.iter().all(|path| is_output(path, output_ext))
}

fn is_output(path: &Path, output_ext: &str) -> bool {
    path.to_string_lossy().ends_with(output_ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(path: &str) -> PathBuf {
        PathBuf::from(path)
    }

    #[test]
    fn test_own_outputs_are_ignored() {
        let events = vec![event("/dist/app.js.gz"), event("/dist/app.css.gz")];
        assert!(!is_relevant(&events, ".gz"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_rerun_keeps_session_alive() {
        use precompress_core::{BuildConfig, CompressionPlugin, PrecompressConfig};

        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("dist");
        std::fs::write(&file, "not a directory").unwrap();

        // Walking below a regular file fails with ENOTDIR
        let mut plugin = CompressionPlugin::new(PrecompressConfig::default());
        plugin.config_resolved(&BuildConfig::new(dir.path(), file.join("assets")));
        assert!(!rerun(&plugin, true).await);

        // A missing output directory is not a failure
        let mut plugin = CompressionPlugin::new(PrecompressConfig::default());
        plugin.config_resolved(&BuildConfig::new(dir.path(), "missing"));
        assert!(rerun(&plugin, true).await);
    }

    #[test]
    fn test_source_change_is_relevant() {
        let events = vec![event("/dist/app.js.gz"), event("/dist/app.js")];
        assert!(is_relevant(&events, ".gz"));
        assert!(is_relevant(&[event("/dist/app.js")], ".br"));
    }
}
