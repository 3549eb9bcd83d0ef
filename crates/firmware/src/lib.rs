//! Cortex-M fault reporting firmware
//!
//! Target-side half of the fault decoder: the HardFault entry point, the
//! console the report is printed on, the terminal halt, and a set of
//! deliberate crashes for trying it all out on a board.
//!
//! # Architecture
//!
//! ```text
//! HardFault vector (cortex-m-rt trampoline)
//!         ↓
//! exception_handlers (this crate)
//!         ↓
//! fault-decoder: snapshot → report → trap state
//!         ↓                   ↓
//! console (defmt/RTT)     halt (idle forever)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for a thumbv7em target (cortex-m-rt, defmt-rtt)
//! - `debug-break` - `bkpt` before idling when a debugger is attached
//!
//! Without features the crate builds on the host so the console and crash
//! tables can be unit tested.
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo run --release -p fault-firmware --target thumbv7em-none-eabihf --features hardware
//! ```

#![cfg_attr(not(test), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod console;
pub mod crash;
pub mod exception_handlers;
pub mod halt;

pub use console::LineSink;
pub use crash::CrashKind;
pub use halt::IdleHalt;
