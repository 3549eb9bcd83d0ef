//! Fault flag catalogue for the Configurable Fault Status Register (CFSR).
//!
//! The CFSR at `0xE000_ED28` packs three sub-registers into one word:
//!
//! ```text
//! [31:16] UFSR  — UsageFault Status Register
//! [15:8]  BFSR  — BusFault Status Register
//! [7:0]   MMFSR — MemManage Fault Status Register
//! ```
//!
//! Every named condition in the report is one bit of this word. The catalogue
//! below is fixed by the ARMv7-M architecture (ARM DDI0403E §B3.2.15) and is
//! not configurable.
//!
//! # Report order
//!
//! Within each sub-register, flags are listed from the validity bit down to
//! bit 0 of that byte range. [`FaultFlag::ALL`] holds exactly that order and
//! the decoder walks it verbatim, so the printed order never depends on the
//! value being decoded.
//!
//! | Sub-register | Flag        | Bit |
//! |--------------|-------------|-----|
//! | MMFSR        | MMARVALID   | 7   |
//! | MMFSR        | MLSPERR     | 5   |
//! | MMFSR        | MSTKERR     | 4   |
//! | MMFSR        | MUNSTKERR   | 3   |
//! | MMFSR        | DACCVIOL    | 1   |
//! | MMFSR        | IACCVIOL    | 0   |
//! | BFSR         | BFARVALID   | 15  |
//! | BFSR         | LSPERR      | 13  |
//! | BFSR         | STKERR      | 12  |
//! | BFSR         | UNSTKERR    | 11  |
//! | BFSR         | IMPRECISERR | 10  |
//! | BFSR         | PRECISERR   | 9   |
//! | BFSR         | IBUSERR     | 8   |
//! | UFSR         | DIVBYZERO   | 25  |
//! | UFSR         | UNALIGNED   | 24  |
//! | UFSR         | NOCP        | 19  |
//! | UFSR         | INVPC       | 18  |
//! | UFSR         | INVSTATE    | 17  |
//! | UFSR         | UNDEFINSTR  | 16  |

/// One of the three logical status registers packed into the CFSR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SubRegister {
    /// MemManage Fault Status Register, CFSR bits [7:0].
    MemManage,
    /// BusFault Status Register, CFSR bits [15:8].
    Bus,
    /// UsageFault Status Register, CFSR bits [31:16].
    Usage,
}

impl SubRegister {
    /// All sub-registers in report order.
    pub const ALL: [Self; 3] = [Self::MemManage, Self::Bus, Self::Usage];

    /// CFSR bits owned by this sub-register.
    #[must_use]
    pub const fn field_mask(self) -> u32 {
        match self {
            Self::MemManage => 0x0000_00FF,
            Self::Bus => 0x0000_FF00,
            Self::Usage => 0xFFFF_0000,
        }
    }

    /// Bit position of the least significant bit of this sub-register.
    #[must_use]
    pub const fn shift(self) -> u32 {
        match self {
            Self::MemManage => 0,
            Self::Bus => 8,
            Self::Usage => 16,
        }
    }

    /// Extract this sub-register's raw value from a CFSR word.
    #[must_use]
    pub const fn extract(self, cfsr: u32) -> u32 {
        (cfsr & self.field_mask()) >> self.shift()
    }

    /// Label that opens this sub-register's line in the report.
    ///
    /// The spellings are kept exactly as existing console-scraping tools
    /// expect them, including the uneven spacing of `"BFSR: "` and `"UFSR :"`.
    #[must_use]
    pub const fn report_label(self) -> &'static str {
        match self {
            Self::MemManage => "MMFSR:",
            Self::Bus => "BFSR: ",
            Self::Usage => "UFSR :",
        }
    }

    /// Flag that marks the companion fault address register as valid.
    ///
    /// UsageFault has no address register.
    #[must_use]
    pub const fn address_valid_flag(self) -> Option<FaultFlag> {
        match self {
            Self::MemManage => Some(FaultFlag::MmarValid),
            Self::Bus => Some(FaultFlag::BfarValid),
            Self::Usage => None,
        }
    }

    /// Flags of this sub-register in report order.
    #[must_use]
    pub fn flags(self) -> &'static [FaultFlag] {
        FaultFlag::for_sub_register(self)
    }
}

/// A named condition backed by a single CFSR bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultFlag {
    // ── MMFSR ──────────────────────────────────────────────────────────────
    /// MMFAR holds a valid fault address.
    MmarValid,
    /// MemManage fault during lazy floating-point state preservation.
    MlspErr,
    /// MemManage fault on exception entry stacking.
    MstkErr,
    /// MemManage fault on exception return unstacking.
    MunstkErr,
    /// Data access violation.
    DaccViol,
    /// Instruction access violation.
    IaccViol,
    // ── BFSR ───────────────────────────────────────────────────────────────
    /// BFAR holds a valid fault address.
    BfarValid,
    /// BusFault during lazy floating-point state preservation.
    LspErr,
    /// BusFault on exception entry stacking.
    StkErr,
    /// BusFault on exception return unstacking.
    UnstkErr,
    /// Imprecise data bus error.
    ImpreciseErr,
    /// Precise data bus error.
    PreciseErr,
    /// Instruction bus error.
    IbusErr,
    // ── UFSR ───────────────────────────────────────────────────────────────
    /// Divide by zero (only trapped when `CCR.DIV_0_TRP` is set).
    DivByZero,
    /// Unaligned access (always for LDM/STM/LDRD/STRD, otherwise only when
    /// `CCR.UNALIGN_TRP` is set).
    Unaligned,
    /// No coprocessor.
    NoCp,
    /// Invalid `EXC_RETURN` value loaded into the PC.
    InvPc,
    /// Invalid EPSR state (e.g. branch to an address with bit 0 clear).
    InvState,
    /// Undefined instruction.
    UndefInstr,
}

impl FaultFlag {
    /// Every flag, grouped by sub-register, in report order.
    pub const ALL: [Self; 19] = [
        Self::MmarValid,
        Self::MlspErr,
        Self::MstkErr,
        Self::MunstkErr,
        Self::DaccViol,
        Self::IaccViol,
        Self::BfarValid,
        Self::LspErr,
        Self::StkErr,
        Self::UnstkErr,
        Self::ImpreciseErr,
        Self::PreciseErr,
        Self::IbusErr,
        Self::DivByZero,
        Self::Unaligned,
        Self::NoCp,
        Self::InvPc,
        Self::InvState,
        Self::UndefInstr,
    ];

    const MEM_MANAGE: [Self; 6] = [
        Self::MmarValid,
        Self::MlspErr,
        Self::MstkErr,
        Self::MunstkErr,
        Self::DaccViol,
        Self::IaccViol,
    ];

    const BUS: [Self; 7] = [
        Self::BfarValid,
        Self::LspErr,
        Self::StkErr,
        Self::UnstkErr,
        Self::ImpreciseErr,
        Self::PreciseErr,
        Self::IbusErr,
    ];

    const USAGE: [Self; 6] = [
        Self::DivByZero,
        Self::Unaligned,
        Self::NoCp,
        Self::InvPc,
        Self::InvState,
        Self::UndefInstr,
    ];

    /// Union of every catalogued bit.
    pub const CATALOGUE_MASK: u32 = 0x030F_BFBB;

    /// Flags belonging to `sub`, in report order.
    #[must_use]
    pub fn for_sub_register(sub: SubRegister) -> &'static [Self] {
        match sub {
            SubRegister::MemManage => &Self::MEM_MANAGE,
            SubRegister::Bus => &Self::BUS,
            SubRegister::Usage => &Self::USAGE,
        }
    }

    /// Architectural name, as printed in the report.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MmarValid => "MMARVALID",
            Self::MlspErr => "MLSPERR",
            Self::MstkErr => "MSTKERR",
            Self::MunstkErr => "MUNSTKERR",
            Self::DaccViol => "DACCVIOL",
            Self::IaccViol => "IACCVIOL",
            Self::BfarValid => "BFARVALID",
            Self::LspErr => "LSPERR",
            Self::StkErr => "STKERR",
            Self::UnstkErr => "UNSTKERR",
            Self::ImpreciseErr => "IMPRECISERR",
            Self::PreciseErr => "PRECISERR",
            Self::IbusErr => "IBUSERR",
            Self::DivByZero => "DIVBYZERO",
            Self::Unaligned => "UNALIGNED",
            Self::NoCp => "NOCP",
            Self::InvPc => "INVPC",
            Self::InvState => "INVSTATE",
            Self::UndefInstr => "UNDEFINSTR",
        }
    }

    /// Bit position within the CFSR word.
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Self::MmarValid => 7,
            Self::MlspErr => 5,
            Self::MstkErr => 4,
            Self::MunstkErr => 3,
            Self::DaccViol => 1,
            Self::IaccViol => 0,
            Self::BfarValid => 15,
            Self::LspErr => 13,
            Self::StkErr => 12,
            Self::UnstkErr => 11,
            Self::ImpreciseErr => 10,
            Self::PreciseErr => 9,
            Self::IbusErr => 8,
            Self::DivByZero => 25,
            Self::Unaligned => 24,
            Self::NoCp => 19,
            Self::InvPc => 18,
            Self::InvState => 17,
            Self::UndefInstr => 16,
        }
    }

    /// Single-bit mask within the CFSR word.
    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << self.bit()
    }

    /// Sub-register this flag is reported under.
    #[must_use]
    pub const fn sub_register(self) -> SubRegister {
        match self.bit() {
            0..=7 => SubRegister::MemManage,
            8..=15 => SubRegister::Bus,
            _ => SubRegister::Usage,
        }
    }

    /// `true` when this flag's bit is set in `cfsr`.
    #[must_use]
    pub const fn is_set(self, cfsr: u32) -> bool {
        cfsr & self.mask() != 0
    }

    /// Iterate over the flags set in `cfsr`, in report order.
    ///
    /// Bits outside the catalogue (reserved bits) are ignored.
    pub fn active(cfsr: u32) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |flag| flag.is_set(cfsr))
    }
}

// Catalogue sanity, checked at compile time: masks are disjoint, each flag
// sits inside its own sub-register, and CATALOGUE_MASK is their union.
const _: () = {
    let mut union = 0u32;
    let mut i = 0;
    while i < FaultFlag::ALL.len() {
        #[allow(clippy::indexing_slicing)] // const loop bounded by len()
        let flag = FaultFlag::ALL[i];
        assert!(union & flag.mask() == 0, "fault flag masks overlap");
        assert!(
            flag.mask() & flag.sub_register().field_mask() != 0,
            "fault flag outside its sub-register"
        );
        union |= flag.mask();
        i = i.wrapping_add(1);
    }
    assert!(union == FaultFlag::CATALOGUE_MASK, "CATALOGUE_MASK out of date");
};
