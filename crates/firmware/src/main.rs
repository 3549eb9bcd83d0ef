//! Fault demo firmware - Main Entry Point
//!
//! Hardware-only entry point. Boots, arms the divide-by-zero trap, then
//! crashes on purpose so the HardFault report can be checked on the console.
//!
//! The crash is picked at build time through `FAULT_DEMO_CRASH` (a
//! [`CrashKind`] name, see `cargo xtask flash --crash`). Unset or unknown
//! names fall back to `invalid-state`.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use fault_firmware::crash::{self, CrashKind};

// Logger transport + panic handler
use defmt_rtt as _;
use panic_probe as _;

/// Crash to trigger when `FAULT_DEMO_CRASH` does not name one.
const DEFAULT_CRASH: CrashKind = CrashKind::InvalidState;

#[entry]
fn main() -> ! {
    defmt::info!("Fault demo firmware v{=str}", env!("CARGO_PKG_VERSION"));

    // SAFETY: first and only access to the core peripherals; nothing else
    // has taken them at this point in reset.
    let mut cp = unsafe { cortex_m::Peripherals::steal() };

    let demo_crash = option_env!("FAULT_DEMO_CRASH")
        .and_then(CrashKind::from_name)
        .unwrap_or(DEFAULT_CRASH);

    // Integer division by zero returns 0 unless this trap is armed.
    crash::enable_div_by_zero_trap(&mut cp.SCB);
    defmt::info!(
        "DIV_0_TRP armed; expected flags for {}: {}",
        demo_crash,
        demo_crash.expected_flags()
    );

    crash::trigger(demo_crash)
}
