use crate::utils::dual_logging::LogFile;
use anyhow::Result;
use chrono::Local;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum number of log entries to keep in memory
pub const MAX_LOG_ENTRIES: usize = 1000;

/// A log entry with timestamp and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S.%3f").to_string(),
            level: level.to_string().to_uppercase(),
            target: target.to_string(),
            message,
        }
    }

    /// Format for display in the debug pane
    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Thread-safe ring buffer for log entries
#[derive(Clone)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl Default for LogRingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LOG_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        // A panicked writer leaves the deque intact
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(count);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Split a compact-format line ("LEVEL target: message") into its parts.
/// Lines without a level prefix are kept whole under INFO/general.
pub fn parse_compact_line(line: &str) -> (Level, &str, &str) {
    let levels = [
        ("TRACE ", Level::TRACE),
        ("DEBUG ", Level::DEBUG),
        ("INFO ", Level::INFO),
        ("WARN ", Level::WARN),
        ("ERROR ", Level::ERROR),
    ];

    let Some((level, rest)) = levels
        .iter()
        .find_map(|(prefix, level)| line.strip_prefix(*prefix).map(|rest| (*level, rest)))
    else {
        return (Level::INFO, "general", line);
    };

    let rest = rest.trim_start();
    match rest.find(':') {
        Some(colon) if !rest[..colon].contains(' ') => {
            (level, &rest[..colon], rest[colon + 1..].trim())
        }
        _ => (level, "general", rest),
    }
}

/// Writer that feeds the ring buffer and, when present, the session log file
#[derive(Clone)]
pub struct DualWriter {
    buffer: LogRingBuffer,
    file: Option<Arc<LogFile>>,
}

impl DualWriter {
    pub fn new(buffer: LogRingBuffer, file: Option<Arc<LogFile>>) -> Self {
        Self { buffer, file }
    }
}

impl std::io::Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = std::str::from_utf8(buf) {
            for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                let (level, target, message) = parse_compact_line(line);
                let entry = LogEntry::new(level, target, message.to_string());

                if let Some(file) = &self.file {
                    file.write_entry(&entry);
                }
                self.buffer.push(entry);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Some(file) = &self.file {
            file.flush();
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for DualWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// What the host keeps after logging is up
#[derive(Clone)]
pub struct LoggingHandle {
    pub buffer: LogRingBuffer,
    pub log_path: Option<PathBuf>,
}

/// Initialize tracing with dual output (ring buffer + session log file).
///
/// `log_dir` of `None` keeps logs in memory only. The filter comes from
/// `RUST_LOG` and defaults to `info`.
pub fn init_tracing(log_dir: Option<&Path>) -> Result<LoggingHandle> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let buffer = LogRingBuffer::new();
    let file = log_dir.map(LogFile::create).transpose()?.map(Arc::new);
    let log_path = file.as_ref().map(|f| f.path().to_path_buf());

    let fmt_layer = fmt::layer()
        .with_writer(DualWriter::new(buffer.clone(), file))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time() // LogEntry stamps its own time
        .compact();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(target: "app", "Logging initialized");

    Ok(LoggingHandle { buffer, log_path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_ring_buffer_caps_entries() {
        let buffer = LogRingBuffer::with_capacity(3);
        for i in 0..5 {
            buffer.push(LogEntry::new(Level::INFO, "test", format!("entry {}", i)));
        }
        assert_eq!(buffer.len(), 3);

        let recent = buffer.get_recent(10);
        assert_eq!(recent[0].message, "entry 2");
        assert_eq!(recent[2].message, "entry 4");
    }

    #[test]
    fn test_get_recent_returns_newest_in_order() {
        let buffer = LogRingBuffer::new();
        for i in 0..4 {
            buffer.push(LogEntry::new(Level::DEBUG, "test", format!("{}", i)));
        }
        let recent: Vec<_> = buffer.get_recent(2).into_iter().map(|e| e.message).collect();
        assert_eq!(recent, vec!["2", "3"]);
    }

    #[test]
    fn test_parse_compact_line() {
        assert_eq!(
            parse_compact_line("DEBUG search: Submitting #3 'anita'"),
            (Level::DEBUG, "search", "Submitting #3 'anita'")
        );
        assert_eq!(
            parse_compact_line("WARN something went wrong: badly"),
            (Level::WARN, "general", "something went wrong: badly")
        );
        assert_eq!(
            parse_compact_line("plain text"),
            (Level::INFO, "general", "plain text")
        );
    }

    #[test]
    fn test_dual_writer_fills_buffer() {
        let buffer = LogRingBuffer::new();
        let mut writer = DualWriter::new(buffer.clone(), None);
        writer
            .write_all(b" INFO selection: Selected patient Anita Sharma\n")
            .unwrap();

        let entries = buffer.get_recent(1);
        assert_eq!(entries[0].level, "INFO");
        assert_eq!(entries[0].target, "selection");
        assert_eq!(entries[0].message, "Selected patient Anita Sharma");
    }
}
