//! Output sinks for the IO instruction family.
//!
//! The machine's only output is a character stream. The trait seam exists
//! so tests can capture that stream instead of scraping process stdout.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Character-stream sink the IO handler writes through
pub trait OutputSink {
    fn write_str(&mut self, s: &str) -> Result<(), String>;
}

/// Sink backed by process standard output
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_str(&mut self, s: &str) -> Result<(), String> {
        let mut stdout = io::stdout();
        stdout
            .write_all(s.as_bytes())
            .map_err(|e| format!("stdout write failed: {e}"))?;
        // Control characters end a line of program output; flush so it is
        // visible even if the program never halts cleanly.
        if s.contains('\n') || s.contains('\r') {
            stdout.flush().map_err(|e| format!("stdout flush failed: {e}"))?;
        }
        Ok(())
    }
}

/// Sink that accumulates output in memory.
///
/// Clones share one buffer, so a test can keep a handle while the
/// interpreter owns the boxed sink.
#[derive(Clone, Default)]
pub struct BufferSink {
    buffer: Rc<RefCell<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        BufferSink::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        self.buffer.borrow().clone()
    }
}

impl OutputSink for BufferSink {
    fn write_str(&mut self, s: &str) -> Result<(), String> {
        self.buffer.borrow_mut().push_str(s);
        Ok(())
    }
}
