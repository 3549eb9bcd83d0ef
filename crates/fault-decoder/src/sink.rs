//! Text sinks for the fault report.
//!
//! The decoder writes to any [`core::fmt::Write`]. That already covers
//! `heapless::String` (tests, RAM capture) and anything with a `fmt::Write`
//! impl. [`IoSink`] bridges to byte-oriented serial drivers implementing
//! [`embedded_io::Write`].
//!
//! A sink used from the HardFault handler runs with the rest of the system
//! frozen. It must be blocking and must not depend on interrupts, an
//! allocator, or a scheduler.

use core::fmt;

/// Adapts a blocking [`embedded_io::Write`] byte stream into a text sink.
///
/// Any transport error is reported as [`fmt::Error`], which stops the report
/// at that point.
pub struct IoSink<W> {
    inner: W,
    written: usize,
}

impl<W: embedded_io::Write> IoSink<W> {
    /// Wrap a byte writer.
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Total bytes accepted by the underlying writer.
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> fmt::Result {
        self.inner.flush().map_err(|_| fmt::Error)
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: embedded_io::Write> fmt::Write for IoSink<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.inner
            .write_all(s.as_bytes())
            .map_err(|_| fmt::Error)?;
        self.written = self.written.saturating_add(s.len());
        Ok(())
    }
}
