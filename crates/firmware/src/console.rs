//! Line-buffered console sink for the fault report.
//!
//! The decoder emits text in small pieces (a label, a flag name, a hex word).
//! Log transports such as defmt/RTT work in whole messages, so [`LineSink`]
//! collects characters until a newline and hands each finished line to an
//! emitter. Empty lines are emitted too; the blank lines are part of the
//! report layout.
//!
//! The buffer is a fixed `heapless::String` on the handler's stack. Nothing
//! here allocates, takes a lock, or waits on an interrupt, so it is usable
//! from the HardFault handler.

use core::fmt;

/// Characters buffered per line before a forced flush.
///
/// The longest report line (the stack frame words) is 72 characters.
pub const LINE_CAPACITY: usize = 128;

/// Text sink that buffers until `'\n'`, then passes the line to `emit`.
///
/// A line longer than [`LINE_CAPACITY`] is emitted in pieces.
pub struct LineSink<F: FnMut(&str)> {
    line: heapless::String<LINE_CAPACITY>,
    emit: F,
    lines_emitted: usize,
}

impl<F: FnMut(&str)> LineSink<F> {
    /// Create a sink that calls `emit` once per completed line.
    pub fn new(emit: F) -> Self {
        Self {
            line: heapless::String::new(),
            emit,
            lines_emitted: 0,
        }
    }

    /// Emit any partial line still in the buffer.
    pub fn flush(&mut self) {
        if !self.line.is_empty() {
            self.emit_line();
        }
    }

    /// Number of lines (or line pieces) handed to the emitter so far.
    pub fn lines_emitted(&self) -> usize {
        self.lines_emitted
    }

    fn emit_line(&mut self) {
        (self.emit)(self.line.as_str());
        self.line.clear();
        self.lines_emitted = self.lines_emitted.saturating_add(1);
    }
}

impl<F: FnMut(&str)> fmt::Write for LineSink<F> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if c == '\n' {
                self.emit_line();
            } else if self.line.push(c).is_err() {
                self.emit_line();
                // Empty buffer always has room for one char.
                let _ = self.line.push(c);
            }
        }
        Ok(())
    }
}

/// Console sink that prints each report line over defmt/RTT.
///
/// Uses `defmt::println!`, which is not subject to `DEFMT_LOG` filtering: the
/// report always reaches the host.
#[cfg(feature = "hardware")]
pub fn defmt_sink() -> LineSink<impl FnMut(&str)> {
    LineSink::new(|line: &str| defmt::println!("{=str}", line))
}
