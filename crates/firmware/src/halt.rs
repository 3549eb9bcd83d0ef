//! Terminal halt after a decoded fault.
//!
//! Once the report is out the core idles forever. Returning from HardFault
//! would resume code whose state is known to be broken, and a reset would
//! wipe the registers before anyone read them off the console.

#[cfg(feature = "hardware")]
use fault_decoder::{FaultTrap, Halt};

/// Disable interrupts and idle forever.
///
/// With the `debug-break` feature, a `bkpt` is issued first when a debugger
/// is attached so the session stops right at the halted handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleHalt;

#[cfg(feature = "hardware")]
impl Halt for IdleHalt {
    fn halt(self, trap: &FaultTrap) -> ! {
        cortex_m::interrupt::disable();
        defmt::error!("fault trap {}; core idle until reset", trap.state());

        #[cfg(feature = "debug-break")]
        if cortex_m::peripheral::DCB::is_debugger_attached() {
            cortex_m::asm::bkpt();
        }

        loop {
            cortex_m::asm::wfe();
        }
    }
}
