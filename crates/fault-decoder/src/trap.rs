//! Trap entry and halt sequencing.
//!
//! ```text
//!   RUNNING ──enter_fault()──▶ FAULTED ──complete()──▶ HALTED
//! ```
//!
//! There is no way back to `Running`: once a HardFault has been decoded the
//! machine state is not trusted and execution never resumes.
//!
//! # Entry contract
//!
//! The entry glue (the firmware's `HardFault` handler, built on the
//! `cortex-m-rt` trampoline) captures the active stack pointer before any
//! other push and passes it here unmodified. [`handle_fault_at`] accepts that
//! raw pointer; [`handle_fault`] accepts an already-read frame.
//!
//! The final step is a [`Halt`] implementation, which must never return. On
//! target that is an idle loop; tests supply one that records the state and
//! unwinds out instead of blocking.

use core::fmt::Write;

use thiserror_no_std::Error;

use crate::frame::ExceptionStackFrame;
use crate::registers::RegisterSource;
use crate::report;

/// Execution state of the fault trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrapState {
    /// Normal program execution.
    #[default]
    Running,
    /// Hardware stacked a frame and entered the fault handler.
    Faulted,
    /// Report emitted; execution will not continue.
    Halted,
}

impl TrapState {
    /// Short lowercase name, for log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Faulted => "faulted",
            Self::Halted => "halted",
        }
    }

    /// `true` for the terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Halted)
    }
}

impl core::fmt::Display for TrapState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trap sequencing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrapError {
    /// Requested a transition the state machine does not have.
    #[error("invalid trap transition {from} -> {to}")]
    InvalidTransition {
        /// State at the time of the request.
        from: TrapState,
        /// State that was requested.
        to: TrapState,
    },
}

/// Fault trap state machine.
#[derive(Debug, Default)]
pub struct FaultTrap {
    state: TrapState,
}

impl FaultTrap {
    /// New trap in the `Running` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TrapState::Running,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> TrapState {
        self.state
    }

    /// `Running` → `Faulted`.
    pub fn enter_fault(&mut self) -> Result<(), TrapError> {
        self.transition(TrapState::Running, TrapState::Faulted)
    }

    /// `Faulted` → `Halted`.
    pub fn complete(&mut self) -> Result<(), TrapError> {
        self.transition(TrapState::Faulted, TrapState::Halted)
    }

    fn transition(&mut self, from: TrapState, to: TrapState) -> Result<(), TrapError> {
        if self.state != from {
            return Err(TrapError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}

/// Terminal action run after the report.
pub trait Halt {
    /// Stop for good. `trap` is already `Halted`.
    fn halt(self, trap: &FaultTrap) -> !;
}

/// Drive the trap from `Running` to `Halted`: decode `frame` into `sink`,
/// then hand over to `halt`.
///
/// Registers are read from `source` after the trap is marked `Faulted`. A
/// sink error cuts the report short but does not stop the halt: there is no
/// one left to report it to.
pub fn handle_fault<R, W, H>(
    trap: &mut FaultTrap,
    frame: &ExceptionStackFrame,
    source: &R,
    sink: &mut W,
    halt: H,
) -> !
where
    R: RegisterSource + ?Sized,
    W: Write + ?Sized,
    H: Halt,
{
    // A second fault while already faulted still has to report and stop.
    let _ = trap.enter_fault();
    let snapshot = source.snapshot();
    let _ = report::decode(frame, &snapshot, sink);
    let _ = trap.complete();
    halt.halt(trap)
}

/// [`handle_fault`] starting from the raw stack pointer captured at entry.
///
/// # Safety
///
/// `sp` must be the stack pointer as hardware left it on exception entry,
/// pointing at the eight-word exception frame. See
/// [`ExceptionStackFrame::from_ptr`].
pub unsafe fn handle_fault_at<R, W, H>(
    trap: &mut FaultTrap,
    sp: *const u32,
    source: &R,
    sink: &mut W,
    halt: H,
) -> !
where
    R: RegisterSource + ?Sized,
    W: Write + ?Sized,
    H: Halt,
{
    // SAFETY: forwarded caller contract.
    let frame = unsafe { ExceptionStackFrame::from_ptr(sp) };
    handle_fault(trap, &frame, source, sink, halt)
}
