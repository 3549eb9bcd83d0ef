//! Exception stack frame.
//!
//! On exception entry the core pushes eight words onto the active stack
//! (MSP or PSP), lowest address first:
//!
//! ```text
//! sp + 0x00  R0
//! sp + 0x04  R1
//! sp + 0x08  R2
//! sp + 0x0C  R3
//! sp + 0x10  R12
//! sp + 0x14  LR    — return address of the interrupted function
//! sp + 0x18  PC    — instruction that faulted (precise faults)
//! sp + 0x1C  xPSR
//! ```
//!
//! With an active FPU context the frame is extended with S0-S15 and FPSCR
//! above these words; only the basic eight are decoded.

use thiserror_no_std::Error;

/// Number of words in the basic exception stack frame.
pub const FRAME_WORDS: usize = 8;

/// Stack frame conversion error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// The source did not hold exactly [`FRAME_WORDS`] words.
    #[error("exception stack frame needs {expected} words, got {actual}")]
    WrongLength {
        /// Words required.
        expected: usize,
        /// Words supplied.
        actual: usize,
    },
}

/// The eight registers saved by hardware on exception entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExceptionStackFrame([u32; FRAME_WORDS]);

impl ExceptionStackFrame {
    /// Column labels, in stacking order.
    pub const COLUMN_NAMES: [&'static str; FRAME_WORDS] =
        ["R0", "R1", "R2", "R3", "R12", "LR", "PC", "xPSR"];

    /// Wrap eight words given in stacking order.
    #[must_use]
    pub const fn new(words: [u32; FRAME_WORDS]) -> Self {
        Self(words)
    }

    /// Read a frame from the stack pointer captured at exception entry.
    ///
    /// Each word is read with volatile semantics; the stack may have been
    /// written by hardware behind the compiler's back.
    ///
    /// # Safety
    ///
    /// `sp` must point at eight readable, word-aligned `u32`s that hold the
    /// frame pushed by hardware, captured before anything else was pushed.
    /// A corrupted stack pointer is not detectable here.
    #[must_use]
    pub unsafe fn from_ptr(sp: *const u32) -> Self {
        let mut words = [0u32; FRAME_WORDS];
        for (offset, word) in words.iter_mut().enumerate() {
            // SAFETY: the caller guarantees `sp..sp + FRAME_WORDS` is a
            // readable exception frame; `offset < FRAME_WORDS`.
            *word = unsafe { core::ptr::read_volatile(sp.add(offset)) };
        }
        Self(words)
    }

    /// All eight words in stacking order.
    #[must_use]
    pub const fn words(&self) -> &[u32; FRAME_WORDS] {
        &self.0
    }

    /// Label/value pairs in stacking order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        Self::COLUMN_NAMES.into_iter().zip(self.0.iter().copied())
    }

    /// Stacked R0.
    #[must_use]
    pub const fn r0(&self) -> u32 {
        self.0[0]
    }

    /// Stacked R1.
    #[must_use]
    pub const fn r1(&self) -> u32 {
        self.0[1]
    }

    /// Stacked R2.
    #[must_use]
    pub const fn r2(&self) -> u32 {
        self.0[2]
    }

    /// Stacked R3.
    #[must_use]
    pub const fn r3(&self) -> u32 {
        self.0[3]
    }

    /// Stacked R12.
    #[must_use]
    pub const fn r12(&self) -> u32 {
        self.0[4]
    }

    /// Stacked link register.
    #[must_use]
    pub const fn lr(&self) -> u32 {
        self.0[5]
    }

    /// Stacked program counter.
    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.0[6]
    }

    /// Stacked program status register.
    #[must_use]
    pub const fn xpsr(&self) -> u32 {
        self.0[7]
    }
}

impl From<[u32; FRAME_WORDS]> for ExceptionStackFrame {
    fn from(words: [u32; FRAME_WORDS]) -> Self {
        Self(words)
    }
}

impl TryFrom<&[u32]> for ExceptionStackFrame {
    type Error = FrameError;

    fn try_from(words: &[u32]) -> Result<Self, Self::Error> {
        let words: [u32; FRAME_WORDS] =
            words.try_into().map_err(|_| FrameError::WrongLength {
                expected: FRAME_WORDS,
                actual: words.len(),
            })?;
        Ok(Self(words))
    }
}
