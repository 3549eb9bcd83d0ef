//! Deliberate faults for exercising the decoder on real hardware.
//!
//! Each [`CrashKind`] provokes one well-known fault class. None of the
//! configurable fault handlers are enabled, so every one of them escalates to
//! HardFault and goes through the same report path as a genuine crash.
//!
//! | Kind                  | Instruction                 | Expected flags         |
//! |-----------------------|-----------------------------|------------------------|
//! | UndefinedInstruction  | `udf #0`                    | UNDEFINSTR             |
//! | InvalidState          | `bx` to even address        | INVSTATE               |
//! | DivideByZero          | `udiv` by 0, DIV_0_TRP set  | DIVBYZERO              |
//! | UnalignedDoubleWord   | `ldrd` from odd address     | UNALIGNED              |
//! | PreciseBusError       | `ldr` from unmapped address | BFARVALID PRECISERR    |
//! | ExecuteNever          | `bx` into the XN system map | IACCVIOL               |

use fault_decoder::FaultFlag;

/// Address with nothing behind it on the common STM32/NXP/Nordic maps.
pub const UNMAPPED_ADDRESS: u32 = 0xFFFF_FFF0;

/// Code address inside the Execute Never system region (Thumb bit set).
pub const EXECUTE_NEVER_ADDRESS: u32 = 0xE000_0001;

/// Code address with the Thumb bit clear.
pub const ARM_STATE_ADDRESS: u32 = 0x0800_0100;

/// Configuration and Control Register bit: trap on divide by zero.
pub const CCR_DIV_0_TRP: u32 = 1 << 4;

/// A fault class the demo firmware can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "hardware", derive(defmt::Format))]
pub enum CrashKind {
    /// Execute a permanently undefined instruction.
    UndefinedInstruction,
    /// Branch to an address with bit 0 clear (ARM state).
    InvalidState,
    /// Unsigned divide by zero with `CCR.DIV_0_TRP` set.
    DivideByZero,
    /// Doubleword load from an unaligned address.
    UnalignedDoubleWord,
    /// Word load from an address with no slave behind it.
    PreciseBusError,
    /// Branch into the Execute Never region.
    ExecuteNever,
}

impl CrashKind {
    /// Every kind, in table order.
    pub const ALL: [Self; 6] = [
        Self::UndefinedInstruction,
        Self::InvalidState,
        Self::DivideByZero,
        Self::UnalignedDoubleWord,
        Self::PreciseBusError,
        Self::ExecuteNever,
    ];

    /// Short name for log lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::UndefinedInstruction => "undefined-instruction",
            Self::InvalidState => "invalid-state",
            Self::DivideByZero => "divide-by-zero",
            Self::UnalignedDoubleWord => "unaligned-doubleword",
            Self::PreciseBusError => "precise-bus-error",
            Self::ExecuteNever => "execute-never",
        }
    }

    /// Look up a kind by [`Self::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// CFSR flags the report should show for this crash, in report order.
    pub const fn expected_flags(self) -> &'static [FaultFlag] {
        match self {
            Self::UndefinedInstruction => &[FaultFlag::UndefInstr],
            Self::InvalidState => &[FaultFlag::InvState],
            Self::DivideByZero => &[FaultFlag::DivByZero],
            Self::UnalignedDoubleWord => &[FaultFlag::Unaligned],
            Self::PreciseBusError => &[FaultFlag::BfarValid, FaultFlag::PreciseErr],
            Self::ExecuteNever => &[FaultFlag::IaccViol],
        }
    }

    /// CFSR value a core reports after this crash (no other bits latched).
    pub fn expected_cfsr(self) -> u32 {
        self.expected_flags()
            .iter()
            .fold(0, |cfsr, flag| cfsr | flag.mask())
    }
}

/// Set `CCR.DIV_0_TRP` so integer division by zero faults instead of
/// returning 0.
#[cfg(feature = "hardware")]
pub fn enable_div_by_zero_trap(scb: &mut cortex_m::peripheral::SCB) {
    // SAFETY: read-modify-write of a single trap-enable bit in CCR; no other
    // CCR field changes and no memory is affected.
    unsafe { scb.ccr.modify(|ccr| ccr | CCR_DIV_0_TRP) };
}

/// Trigger `kind`. Control never comes back: the HardFault handler halts.
#[cfg(feature = "hardware")]
pub fn trigger(kind: CrashKind) -> ! {
    use core::arch::asm;

    defmt::warn!("triggering {=str}", kind.name());

    // SAFETY: every arm deliberately executes a faulting instruction. The
    // fault is the point; nothing after it runs.
    unsafe {
        match kind {
            CrashKind::UndefinedInstruction => asm!("udf #0", options(noreturn)),
            CrashKind::InvalidState => {
                asm!("bx {0}", in(reg) ARM_STATE_ADDRESS, options(noreturn));
            }
            CrashKind::DivideByZero => {
                asm!("udiv {0}, {1}, {2}", out(reg) _, in(reg) 1u32, in(reg) 0u32);
            }
            CrashKind::UnalignedDoubleWord => {
                let base = core::ptr::addr_of!(UNALIGNED_TARGET) as u32;
                asm!(
                    "ldrd {0}, {1}, [{2}]",
                    out(reg) _,
                    out(reg) _,
                    in(reg) base | 1,
                );
            }
            CrashKind::PreciseBusError => {
                let _ = core::ptr::read_volatile(UNMAPPED_ADDRESS as *const u32);
            }
            CrashKind::ExecuteNever => {
                asm!("bx {0}", in(reg) EXECUTE_NEVER_ADDRESS, options(noreturn));
            }
        }
    }

    // Only reached if the core did not fault (e.g. a part that maps
    // UNMAPPED_ADDRESS). Nothing sensible left to do.
    defmt::error!("{=str} did not fault", kind.name());
    loop {
        cortex_m::asm::wfe();
    }
}

#[cfg(feature = "hardware")]
static UNALIGNED_TARGET: [u32; 4] = [0; 4];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fault_decoder::{render, ExceptionStackFrame, FaultStatusSnapshot, SubRegister, MAX_REPORT_LEN};

    #[test]
    fn names_round_trip() {
        for kind in CrashKind::ALL {
            assert_eq!(CrashKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(CrashKind::from_name("stack-overflow"), None);
    }

    #[test]
    fn expected_flags_are_in_report_order() {
        for kind in CrashKind::ALL {
            let from_cfsr: Vec<FaultFlag> = FaultFlag::active(kind.expected_cfsr()).collect();
            assert_eq!(from_cfsr, kind.expected_flags(), "{kind:?}");
        }
    }

    #[test]
    fn precise_bus_error_report_shows_valid_bfar() {
        let kind = CrashKind::PreciseBusError;
        let snap = FaultStatusSnapshot::new(kind.expected_cfsr(), 0, UNMAPPED_ADDRESS);
        let report: heapless::String<MAX_REPORT_LEN> =
            render(&ExceptionStackFrame::default(), &snap).unwrap();
        assert!(report.contains("BFSR:  BFARVALID PRECISERR\nBFAR: FFFFFFF0\n"));
    }

    #[test]
    fn usage_crashes_stay_in_ufsr() {
        for kind in [
            CrashKind::UndefinedInstruction,
            CrashKind::InvalidState,
            CrashKind::DivideByZero,
            CrashKind::UnalignedDoubleWord,
        ] {
            assert!(kind
                .expected_flags()
                .iter()
                .all(|flag| flag.sub_register() == SubRegister::Usage));
        }
    }

    #[test]
    fn trap_addresses_have_expected_thumb_bit() {
        assert_eq!(ARM_STATE_ADDRESS & 1, 0);
        assert_eq!(EXECUTE_NEVER_ADDRESS & 1, 1);
        assert_eq!(CCR_DIV_0_TRP, 0x10);
    }
}
