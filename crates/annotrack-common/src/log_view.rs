//! In-process log buffer
//!
//! A `LogView` is the sink behind the front-end's log panel. It is created
//! explicitly at start-up, handed to [`crate::logging::init_logging`], and
//! cloned wherever the lines need to be read. Only the newest `capacity`
//! lines are kept.
//!
//! Delivery is best effort: a poisoned lock or a non-UTF-8 write drops the
//! line instead of failing the code that emitted the event.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing_subscriber::fmt::MakeWriter;

/// Default number of retained lines
pub const DEFAULT_LOG_VIEW_CAPACITY: usize = 1_000;

/// Shared, bounded buffer of formatted log lines
#[derive(Debug, Clone)]
pub struct LogView {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl Default for LogView {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_VIEW_CAPACITY)
    }
}

impl LogView {
    /// Create a view holding at most `capacity` lines, seeded with a
    /// start-up banner.
    pub fn new(capacity: usize) -> Self {
        let view = Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(1024)))),
            capacity: capacity.max(1),
        };
        view.push(format!(
            "Logger started {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        view
    }

    /// Append a line, evicting the oldest one when full
    pub fn push(&self, line: impl Into<String>) {
        let Ok(mut lines) = self.lines.lock() else {
            return;
        };
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line.into());
    }

    /// Snapshot of the retained lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|lines| lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

/// Writer handed out per event; flushes complete lines into the view on drop
pub struct LogViewWriter {
    view: LogView,
    buf: Vec<u8>,
}

impl io::Write for LogViewWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogViewWriter {
    fn drop(&mut self) {
        if let Ok(text) = std::str::from_utf8(&self.buf) {
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                self.view.push(line.trim_end());
            }
        }
    }
}

impl<'a> MakeWriter<'a> for LogView {
    type Writer = LogViewWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogViewWriter {
            view: self.clone(),
            buf: Vec::new(),
        }
    }
}
