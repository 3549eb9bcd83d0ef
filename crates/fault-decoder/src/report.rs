//! Fault report formatting.
//!
//! Produces the console report for a captured fault. The layout is fixed so
//! that scripts can grep for the section labels:
//!
//! ```text
//!
//! *** Fault occurred ***
//!
//! Stack Frame
//! ----------
//!    R0       R1       R2       R3      R12       LR       PC     xPSR
//! 00000001 00000000 00000000 00000000 00000000 08000101 08000200 61000000
//!
//! MMFSR:
//! MMFAR: 00000000
//!
//! BFSR:
//! BFAR: 00000000
//!
//! UFSR : INVSTATE
//!
//! ```
//!
//! Details the scripts depend on:
//!
//! - every value is `{:08X}`: eight uppercase hex digits, zero padded
//! - each stack word is followed by one space, including the last
//! - flag names follow the label, each preceded by one space, in
//!   [`FaultFlag::ALL`] order
//! - MMFAR and BFAR are always printed, valid or not; MMARVALID / BFARVALID
//!   on the line above tell the reader whether to trust them
//! - the label spellings `"MMFSR:"`, `"BFSR: "`, `"UFSR :"` are historical
//!   and kept as-is
//!
//! Nothing here allocates or can fail on its own. The only error is one the
//! sink reports, which is passed straight back.

use core::fmt::{self, Write};

use crate::flags::{FaultFlag, SubRegister};
use crate::frame::ExceptionStackFrame;
use crate::registers::{FaultStatusSnapshot, RegisterSource};

/// Banner line that opens every report.
pub const BANNER: &str = "*** Fault occurred ***";

/// Stack frame section title.
pub const STACK_FRAME_TITLE: &str = "Stack Frame";

/// Column header above the stack frame words.
pub const STACK_FRAME_HEADER: &str =
    "   R0       R1       R2       R3      R12       LR       PC     xPSR";

/// Length in bytes of the longest possible report (every flag set).
pub const MAX_REPORT_LEN: usize = 414;

/// Label of the address register line paired with `sub`.
#[must_use]
pub const fn address_label(sub: SubRegister) -> Option<&'static str> {
    match sub {
        SubRegister::MemManage => Some("MMFAR:"),
        SubRegister::Bus => Some("BFAR:"),
        SubRegister::Usage => None,
    }
}

/// Write the complete fault report for `frame` and `snapshot` to `sink`.
///
/// Sections are emitted in a fixed order: banner, stack frame, MemManage,
/// BusFault, UsageFault. Decoding the same inputs twice produces identical
/// text.
pub fn decode<W: Write + ?Sized>(
    frame: &ExceptionStackFrame,
    snapshot: &FaultStatusSnapshot,
    sink: &mut W,
) -> fmt::Result {
    write!(sink, "\n{BANNER}\n\n")?;
    write_stack_frame(sink, frame)?;

    for sub in SubRegister::ALL {
        write_flag_line(sink, sub, snapshot.cfsr)?;
        match (address_label(sub), snapshot.address_for(sub)) {
            (Some(label), Some(value)) => write_address_line(sink, label, value)?,
            _ => sink.write_str("\n")?,
        }
    }
    Ok(())
}

/// Write the stack frame section: title, column header, and the eight words.
pub fn write_stack_frame<W: Write + ?Sized>(
    sink: &mut W,
    frame: &ExceptionStackFrame,
) -> fmt::Result {
    write!(sink, "{STACK_FRAME_TITLE}\n----------\n{STACK_FRAME_HEADER}\n")?;
    for word in frame.words() {
        write!(sink, "{word:08X} ")?;
    }
    sink.write_str("\n\n")
}

/// Write one sub-register line: its label, then the name of every set flag.
pub fn write_flag_line<W: Write + ?Sized>(
    sink: &mut W,
    sub: SubRegister,
    cfsr: u32,
) -> fmt::Result {
    sink.write_str(sub.report_label())?;
    for flag in sub.flags().iter().filter(|flag| flag.is_set(cfsr)) {
        write!(sink, " {}", flag.name())?;
    }
    sink.write_str("\n")
}

/// Write a fault address register line followed by a blank line.
///
/// The value is printed whether or not its validity flag is set.
pub fn write_address_line<W: Write + ?Sized>(sink: &mut W, label: &str, value: u32) -> fmt::Result {
    write!(sink, "{label} {value:08X}\n\n")
}

/// Render the report into a fixed-capacity string.
///
/// `N` of at least [`MAX_REPORT_LEN`] always fits; a smaller buffer returns
/// [`fmt::Error`] once full.
pub fn render<const N: usize>(
    frame: &ExceptionStackFrame,
    snapshot: &FaultStatusSnapshot,
) -> Result<heapless::String<N>, fmt::Error> {
    let mut text = heapless::String::new();
    decode(frame, snapshot, &mut text)?;
    Ok(text)
}

/// Decoder bound to a register source.
///
/// Reads the fault status registers at the moment of decoding, which is what
/// the HardFault handler wants. Tests bind a mock source instead.
#[derive(Debug)]
pub struct FaultDecoder<R> {
    source: R,
}

impl<R: RegisterSource> FaultDecoder<R> {
    /// Bind a decoder to `source`.
    pub const fn new(source: R) -> Self {
        Self { source }
    }

    /// Register source this decoder reads from.
    pub fn source(&self) -> &R {
        &self.source
    }

    /// Snapshot the registers now, then write the report for `frame`.
    pub fn decode_frame<W: Write + ?Sized>(
        &self,
        frame: &ExceptionStackFrame,
        sink: &mut W,
    ) -> fmt::Result {
        let snapshot = self.source.snapshot();
        decode(frame, &snapshot, sink)
    }
}
