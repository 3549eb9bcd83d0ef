//! Cortex-M fault decoder
//!
//! Turns the state a Cortex-M core leaves behind after a HardFault into a
//! readable text report, for boards where no debugger is attached and a
//! serial console is all there is.
//!
//! # Pipeline
//!
//! ```text
//! HardFault entry (firmware crate, cortex-m-rt trampoline)
//!         ↓  stack pointer, untouched
//! ExceptionStackFrame (frame)       FaultStatusSnapshot (registers)
//!         ↓                                 ↓
//!                 report::decode → text sink
//!                         ↓
//!                 FaultTrap → Halted (trap)
//! ```
//!
//! The crate reports raw facts only: which CFSR bits are set, what the
//! address registers hold, and what the core stacked. It does not guess at a
//! root cause.
//!
//! # Features
//!
//! - `std`: exposes [`mocks`] outside of unit tests (host tools)
//! - `defmt`: derives `defmt::Format` on public types
//!
//! # Example
//!
//! ```
//! use fault_decoder::{render, ExceptionStackFrame, FaultStatusSnapshot, MAX_REPORT_LEN};
//!
//! let frame = ExceptionStackFrame::new([1, 0, 0, 0, 0, 0x0800_0101, 0x0800_0200, 0x6100_0000]);
//! let snapshot = FaultStatusSnapshot::new(0x0002_0000, 0, 0);
//! let report = render::<MAX_REPORT_LEN>(&frame, &snapshot).unwrap();
//! assert!(report.contains("UFSR : INVSTATE"));
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in the fault path
#![deny(clippy::expect_used)] // no .expect() in the fault path
#![deny(clippy::panic)] // a panic inside HardFault escalates to lockup
#![deny(clippy::unreachable)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // the report goes to the sink, never stdout
// Pedantic lints suppressed for this register-level crate:
#![allow(clippy::doc_markdown)] // register names (HardFault, MMFAR) in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // fmt::Result / TrapError are self-explanatory

pub mod flags;
pub mod frame;
pub mod mocks;
pub mod registers;
pub mod report;
pub mod sink;
pub mod trap;

pub use flags::{FaultFlag, SubRegister};
pub use frame::{ExceptionStackFrame, FrameError, FRAME_WORDS};
pub use registers::{CortexMRegisters, FaultStatusSnapshot, RegisterSource};
pub use report::{decode, render, FaultDecoder, MAX_REPORT_LEN};
pub use sink::IoSink;
pub use trap::{handle_fault, handle_fault_at, FaultTrap, Halt, TrapError, TrapState};
