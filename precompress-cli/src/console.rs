//! Terminal logger handed to the pipeline as its host logger.

use colored::Colorize;
use precompress_core::Logger;

/// Prints summaries to stdout and problems to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn info(&self, msg: &str) {
        if msg.trim_start().starts_with('✨') {
            println!("{}", msg.cyan());
        } else {
            println!("{}", msg);
        }
    }

    fn warn(&self, msg: &str) {
        eprintln!("  {} {}", "⚠".yellow(), msg);
    }

    fn error(&self, msg: &str) {
        eprintln!("  {} {}", "✗".red().bold(), msg.red());
    }
}
