//! Mock implementations for testing
//!
//! Synthetic register values for running the decoder off-target.

#![cfg(any(test, feature = "std"))]

use core::cell::Cell;

use crate::registers::{FaultStatusSnapshot, RegisterSource};

/// Register source backed by fixed values.
///
/// Counts reads per register so tests can check that a snapshot touches each
/// register exactly once.
#[derive(Debug, Default)]
pub struct MockRegisters {
    cfsr: u32,
    mmfar: u32,
    bfar: u32,
    reads: [Cell<usize>; 3],
}

impl MockRegisters {
    /// Create a mock returning the given CFSR, MMFAR and BFAR values.
    pub fn new(cfsr: u32, mmfar: u32, bfar: u32) -> Self {
        Self {
            cfsr,
            mmfar,
            bfar,
            reads: Default::default(),
        }
    }

    /// Create a mock that replays `snapshot`.
    pub fn from_snapshot(snapshot: FaultStatusSnapshot) -> Self {
        Self::new(snapshot.cfsr, snapshot.mmfar, snapshot.bfar)
    }

    /// Read counts as `[cfsr, mmfar, bfar]`.
    pub fn reads(&self) -> [usize; 3] {
        let [cfsr, mmfar, bfar] = &self.reads;
        [cfsr.get(), mmfar.get(), bfar.get()]
    }

    fn count(cell: &Cell<usize>) {
        cell.set(cell.get().saturating_add(1));
    }
}

impl RegisterSource for MockRegisters {
    fn read_combined_status(&self) -> u32 {
        let [cfsr, _, _] = &self.reads;
        Self::count(cfsr);
        self.cfsr
    }

    fn read_mm_fault_address(&self) -> u32 {
        let [_, mmfar, _] = &self.reads;
        Self::count(mmfar);
        self.mmfar
    }

    fn read_bus_fault_address(&self) -> u32 {
        let [_, _, bfar] = &self.reads;
        Self::count(bfar);
        self.bfar
    }
}
