//! Fault status register snapshot.
//!
//! Three System Control Block registers describe a configurable fault:
//!
//! | Register | Address       | Contents                                  |
//! |----------|---------------|-------------------------------------------|
//! | CFSR     | 0xE000_ED28   | MMFSR, BFSR and UFSR packed into one word |
//! | MMFAR    | 0xE000_ED34   | MemManage fault address (if MMARVALID)    |
//! | BFAR     | 0xE000_ED38   | BusFault address (if BFARVALID)           |
//!
//! The values latch when the fault is raised and stay put until software
//! writes 1s to clear them, so reading them back to back is enough to get a
//! consistent picture. Reading never clears or alters them.
//!
//! Access goes through the [`RegisterSource`] trait so the decoder can run on
//! the host with synthetic values. [`CortexMRegisters`] is the only
//! implementation that touches hardware.
//!
//! # References
//!
//! - ARMv7-M Architecture Reference Manual DDI0403E §B3.2.15 - §B3.2.18
//! - Cortex-M4 Devices Generic User Guide DUI0553 §4.3.10 - §4.3.13

use crate::flags::{FaultFlag, SubRegister};

/// Configurable Fault Status Register address.
pub const CFSR_ADDR: usize = 0xE000_ED28;

/// MemManage Fault Address Register address.
pub const MMFAR_ADDR: usize = 0xE000_ED34;

/// BusFault Address Register address.
pub const BFAR_ADDR: usize = 0xE000_ED38;

/// Read access to the three fault status registers.
///
/// Implementations must not cache: every call observes the register as it is
/// now.
pub trait RegisterSource {
    /// Read the combined fault status word (CFSR).
    fn read_combined_status(&self) -> u32;

    /// Read the MemManage fault address register (MMFAR).
    fn read_mm_fault_address(&self) -> u32;

    /// Read the BusFault address register (BFAR).
    fn read_bus_fault_address(&self) -> u32;

    /// Capture all three registers in immediate succession.
    ///
    /// Read order is CFSR, MMFAR, BFAR.
    fn snapshot(&self) -> FaultStatusSnapshot {
        let cfsr = self.read_combined_status();
        let mmfar = self.read_mm_fault_address();
        let bfar = self.read_bus_fault_address();
        FaultStatusSnapshot::new(cfsr, mmfar, bfar)
    }
}

impl<T: RegisterSource + ?Sized> RegisterSource for &T {
    fn read_combined_status(&self) -> u32 {
        (**self).read_combined_status()
    }

    fn read_mm_fault_address(&self) -> u32 {
        (**self).read_mm_fault_address()
    }

    fn read_bus_fault_address(&self) -> u32 {
        (**self).read_bus_fault_address()
    }
}

/// Memory-mapped System Control Block fault registers.
///
/// Zero-sized: all state lives in hardware.
#[derive(Debug)]
pub struct CortexMRegisters {
    _private: (),
}

impl CortexMRegisters {
    /// Bind to the SCB fault registers of the running core.
    ///
    /// # Safety
    ///
    /// The caller must be running on an ARMv7-M or ARMv8-M Mainline core
    /// (Cortex-M3/M4/M7/M33/M55), where the SCB fault registers are mapped at
    /// [`CFSR_ADDR`], [`MMFAR_ADDR`] and [`BFAR_ADDR`]. ARMv6-M parts
    /// (Cortex-M0/M0+) have no CFSR and reading it raises a bus fault.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }

    fn read(addr: usize) -> u32 {
        // SAFETY: `CortexMRegisters` can only be constructed through the
        // unsafe `new`, whose caller guarantees `addr` is one of the
        // word-aligned, always-readable SCB fault registers. Volatile keeps
        // the compiler from merging or hoisting the hardware read.
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }
}

impl RegisterSource for CortexMRegisters {
    fn read_combined_status(&self) -> u32 {
        Self::read(CFSR_ADDR)
    }

    fn read_mm_fault_address(&self) -> u32 {
        Self::read(MMFAR_ADDR)
    }

    fn read_bus_fault_address(&self) -> u32 {
        Self::read(BFAR_ADDR)
    }
}

/// Fault status registers captured together at the start of decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultStatusSnapshot {
    /// Combined fault status word (CFSR).
    pub cfsr: u32,
    /// MemManage fault address. Meaningful only if [`Self::mmfar_valid`].
    pub mmfar: u32,
    /// BusFault address. Meaningful only if [`Self::bfar_valid`].
    pub bfar: u32,
}

impl FaultStatusSnapshot {
    /// Build a snapshot from raw register values.
    #[must_use]
    pub const fn new(cfsr: u32, mmfar: u32, bfar: u32) -> Self {
        Self { cfsr, mmfar, bfar }
    }

    /// MemManage Fault Status Register (CFSR byte 0).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // extract() of an 8-bit field
    pub const fn mmfsr(&self) -> u8 {
        SubRegister::MemManage.extract(self.cfsr) as u8
    }

    /// BusFault Status Register (CFSR byte 1).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // extract() of an 8-bit field
    pub const fn bfsr(&self) -> u8 {
        SubRegister::Bus.extract(self.cfsr) as u8
    }

    /// UsageFault Status Register (CFSR bytes 2-3).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // extract() of a 16-bit field
    pub const fn ufsr(&self) -> u16 {
        SubRegister::Usage.extract(self.cfsr) as u16
    }

    /// `true` when MMARVALID is set, i.e. [`Self::mmfar`] holds the faulting
    /// address.
    #[must_use]
    pub const fn mmfar_valid(&self) -> bool {
        FaultFlag::MmarValid.is_set(self.cfsr)
    }

    /// `true` when BFARVALID is set, i.e. [`Self::bfar`] holds the faulting
    /// address.
    #[must_use]
    pub const fn bfar_valid(&self) -> bool {
        FaultFlag::BfarValid.is_set(self.cfsr)
    }

    /// Raw address register paired with `sub`, if it has one.
    #[must_use]
    pub const fn address_for(&self, sub: SubRegister) -> Option<u32> {
        match sub {
            SubRegister::MemManage => Some(self.mmfar),
            SubRegister::Bus => Some(self.bfar),
            SubRegister::Usage => None,
        }
    }

    /// `true` when no catalogued flag is set.
    ///
    /// A HardFault with a clear CFSR was not escalated from a configurable
    /// fault (e.g. a vector table read error or a debug event).
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        self.cfsr & FaultFlag::CATALOGUE_MASK == 0
    }

    /// Flags set in this snapshot, in report order.
    pub fn active_flags(&self) -> impl Iterator<Item = FaultFlag> {
        FaultFlag::active(self.cfsr)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::MockRegisters;

    #[test]
    fn addresses_match_scb_layout() {
        assert_eq!(CFSR_ADDR, 0xE000_ED28);
        assert_eq!(MMFAR_ADDR, 0xE000_ED34);
        assert_eq!(BFAR_ADDR, 0xE000_ED38);
    }

    #[test]
    fn snapshot_reads_each_register_once() {
        let regs = MockRegisters::new(0x0002_0000, 0x1111_1111, 0x2222_2222);
        let snap = regs.snapshot();
        assert_eq!(snap, FaultStatusSnapshot::new(0x0002_0000, 0x1111_1111, 0x2222_2222));
        assert_eq!(regs.reads(), [1, 1, 1]);
    }

    #[test]
    fn snapshot_through_reference_uses_same_source() {
        let regs = MockRegisters::new(0x80, 0x2000_0004, 0);
        let by_ref: &dyn RegisterSource = &regs;
        let snap = (&by_ref).snapshot();
        assert_eq!(snap.mmfar, 0x2000_0004);
        assert_eq!(regs.reads(), [1, 1, 1]);
    }

    #[test]
    fn sub_register_accessors_split_cfsr() {
        let snap = FaultStatusSnapshot::new(0x0201_8280, 0, 0);
        assert_eq!(snap.mmfsr(), 0x80);
        assert_eq!(snap.bfsr(), 0x82);
        assert_eq!(snap.ufsr(), 0x0201);
    }

    #[test]
    fn validity_flags_follow_cfsr() {
        let snap = FaultStatusSnapshot::new(0x0000_8000, 0, 0xDEAD_BEEF);
        assert!(!snap.mmfar_valid());
        assert!(snap.bfar_valid());

        let snap = FaultStatusSnapshot::new(0x0000_0080, 0x2000_0000, 0);
        assert!(snap.mmfar_valid());
        assert!(!snap.bfar_valid());
    }

    #[test]
    fn address_for_pairs_registers_with_sub_registers() {
        let snap = FaultStatusSnapshot::new(0, 0xAAAA_AAAA, 0xBBBB_BBBB);
        assert_eq!(snap.address_for(SubRegister::MemManage), Some(0xAAAA_AAAA));
        assert_eq!(snap.address_for(SubRegister::Bus), Some(0xBBBB_BBBB));
        assert_eq!(snap.address_for(SubRegister::Usage), None);
    }

    #[test]
    fn is_clear_ignores_reserved_bits() {
        assert!(FaultStatusSnapshot::default().is_clear());
        assert!(FaultStatusSnapshot::new(0x00F0_4044, 0, 0).is_clear());
        assert!(!FaultStatusSnapshot::new(0x0002_0000, 0, 0).is_clear());
    }

    #[test]
    fn active_flags_lists_set_bits() {
        let snap = FaultStatusSnapshot::new(0x0200_0082, 0, 0);
        let flags: heapless::Vec<FaultFlag, 19> = snap.active_flags().collect();
        assert_eq!(
            flags.as_slice(),
            &[FaultFlag::MmarValid, FaultFlag::DaccViol, FaultFlag::DivByZero]
        );
    }
}
