//! Log sinks injected into the combine pipeline.
//!
//! The pipeline never prints directly. It hands every notable step to a
//! [`LogSink`], which keeps the transforms testable and lets the CLI decide
//! how lines are rendered.

use parking_lot::Mutex;

/// Line-oriented log destination.
pub trait LogSink: Sync {
    /// Emit one log line tagged with a module name (e.g. `"import"`).
    fn line(&self, module: &str, message: &str);
}

/// Forwards lines to the colored terminal logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn line(&self, module: &str, message: &str) {
        crate::logger::log(module, message);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn line(&self, _module: &str, _message: &str) {}
}

/// Collects lines in memory as `[module] message`.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines logged so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Whether any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(needle))
    }
}

impl LogSink for MemorySink {
    fn line(&self, module: &str, message: &str) {
        self.lines.lock().push(format!("[{module}] {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects() {
        let sink = MemorySink::new();
        sink.line("import", "importing: base.css");
        sink.line("delete", "deleting: base.css");

        assert_eq!(
            sink.lines(),
            vec!["[import] importing: base.css", "[delete] deleting: base.css"]
        );
        assert!(sink.contains("deleting"));
        assert!(!sink.contains("keeping"));
    }
}
