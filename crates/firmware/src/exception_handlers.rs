//! Cortex-M HardFault entry.
//!
//! This is the glue between the hardware exception and the portable decoder
//! in `fault-decoder`:
//!
//! 1. The core stacks R0-R3, R12, LR, PC, xPSR and vectors to HardFault.
//! 2. `cortex-m-rt`'s trampoline tests `EXC_RETURN` bit 2, picks MSP or PSP,
//!    and passes that stack pointer as `ef` before anything else is pushed
//!    onto the faulting stack.
//! 3. [`HardFault`] hands the same pointer, unmodified, to
//!    [`fault_decoder::handle_fault_at`], which snapshots CFSR/MMFAR/BFAR,
//!    prints the report through the defmt console sink, marks the trap
//!    `Halted` and idles via [`IdleHalt`].
//!
//! Step 2 is why there is no hand-written assembly here: the trampoline
//! already captures the stack pointer exactly as hardware left it.
//!
//! # Faults this cannot report
//!
//! If the fault came from a corrupted stack pointer (MSTKERR/STKERR with SP
//! outside RAM), the handler itself may not be able to run. With flip-link
//! the stack overflows off the bottom of RAM, which is exactly this case.
//!
//! # Hardware-only handler
//!
//! The `#[cortex_m_rt::exception]` attribute requires ARM target intrinsics
//! and is therefore gated behind `#[cfg(feature = "hardware")]`.
//! [`fault_report_lines`] is the same report path with the hardware removed,
//! used by host tests.

#![allow(clippy::doc_markdown)] // Exception handler docs use hardware terminology (HardFault, SVC) as plain text

use fault_decoder::{ExceptionStackFrame, FaultStatusSnapshot};

use crate::console::LineSink;

#[cfg(feature = "hardware")]
use crate::halt::IdleHalt;

/// Run the report path the HardFault handler uses, emitting each line to
/// `emit`, without touching hardware or halting.
///
/// Returns the number of lines emitted.
pub fn fault_report_lines(
    frame: &ExceptionStackFrame,
    snapshot: &FaultStatusSnapshot,
    emit: impl FnMut(&str),
) -> usize {
    let mut sink = LineSink::new(emit);
    // LineSink never reports an error.
    let _ = fault_decoder::decode(frame, snapshot, &mut sink);
    sink.flush();
    sink.lines_emitted()
}

/// HardFault exception handler (hardware target only).
///
/// # Triggers
///
/// - Any configurable fault (MemManage, BusFault, UsageFault) whose own
///   handler is disabled, which is the reset default
/// - Bus error on a vector table read
/// - A fault raised while a configurable fault handler was already running
///
/// # Behavior
///
/// Prints the decoded fault report over defmt/RTT, then halts the processor
/// for good. On release builds without a debugger attached the RTT output
/// sits in the up-channel buffer until a host attaches.
///
/// # Safety
///
/// This function must never return — returning from a HardFault handler is
/// undefined behavior on Cortex-M. The `-> !` return type enforces this.
#[cfg(feature = "hardware")]
#[cortex_m_rt::exception]
#[allow(unsafe_code)]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    let sp = ef as *const cortex_m_rt::ExceptionFrame as *const u32;
    defmt::error!("HardFault! Stacked exception frame at 0x{:08X}", sp as u32);

    // SAFETY: this firmware only builds for thumbv7em (ARMv7-M), where the
    // SCB fault registers are mapped.
    let scb = unsafe { fault_decoder::CortexMRegisters::new() };
    // Nothing observes the trap before this point, so it starts out Running
    // here and is walked through Faulted to Halted by handle_fault_at.
    let mut trap = fault_decoder::FaultTrap::new();
    let mut console = crate::console::defmt_sink();

    // SAFETY: `ExceptionFrame` is `#[repr(C)]` with the eight stacked words in
    // hardware order, and `ef` is the stack pointer the trampoline captured
    // on entry.
    unsafe { fault_decoder::handle_fault_at(&mut trap, sp, &scb, &mut console, IdleHalt) }
}
