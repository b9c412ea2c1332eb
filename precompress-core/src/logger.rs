//! Host logging channel

use parking_lot::Mutex;

/// Logger supplied by the host build tool.
pub trait Logger: Send + Sync {
    fn info(&self, msg: &str);

    fn warn(&self, msg: &str) {
        self.info(msg);
    }

    fn error(&self, msg: &str);
}

/// Routes host messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, msg: &str) {
        tracing::info!(target: "precompress", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "precompress", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "precompress", "{}", msg);
    }
}

/// Severity of a captured line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines, oldest first
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    /// Messages captured at `level`
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    fn push(&self, level: LogLevel, msg: &str) {
        self.lines.lock().push((level, msg.to_string()));
    }
}

impl Logger for MemoryLogger {
    fn info(&self, msg: &str) {
        self.push(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(LogLevel::Error, msg);
    }
}
