//! Report layout tests — run with `cargo test -p fault-decoder --test report_format`
//!
//! Console-scraping tools key on the exact text, so these compare whole
//! lines rather than fragments wherever possible.
#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use fault_decoder::{
    decode, render, ExceptionStackFrame, FaultDecoder, FaultStatusSnapshot, RegisterSource,
    MAX_REPORT_LEN,
};

type Report = heapless::String<MAX_REPORT_LEN>;

/// Register source with fixed values, standing in for the SCB.
struct Scb(FaultStatusSnapshot);

impl RegisterSource for Scb {
    fn read_combined_status(&self) -> u32 {
        self.0.cfsr
    }

    fn read_mm_fault_address(&self) -> u32 {
        self.0.mmfar
    }

    fn read_bus_fault_address(&self) -> u32 {
        self.0.bfar
    }
}

fn sample_frame() -> ExceptionStackFrame {
    ExceptionStackFrame::new([
        0x0000_0001,
        0,
        0,
        0,
        0,
        0x0800_0101,
        0x0800_0200,
        0x6100_0000,
    ])
}

fn lines(report: &str) -> heapless::Vec<&str, 32> {
    report.split('\n').collect()
}

// ── Reference examples ───────────────────────────────────────────────────────

#[test]
fn invstate_example_line_by_line() {
    let snap = FaultStatusSnapshot::new(0x0002_0000, 0, 0);
    let report: Report = render(&sample_frame(), &snap).unwrap();
    let lines = lines(&report);

    assert_eq!(lines[0], "");
    assert_eq!(lines[1], "*** Fault occurred ***");
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "Stack Frame");
    assert_eq!(lines[4], "----------");
    assert_eq!(
        lines[5],
        "   R0       R1       R2       R3      R12       LR       PC     xPSR"
    );
    assert_eq!(
        lines[6].trim_end(),
        "00000001 00000000 00000000 00000000 00000000 08000101 08000200 61000000"
    );
    assert_eq!(lines[7], "");
    assert_eq!(lines[8], "MMFSR:");
    assert_eq!(lines[9], "MMFAR: 00000000");
    assert_eq!(lines[10], "");
    assert_eq!(lines[11].trim_end(), "BFSR:");
    assert_eq!(lines[12], "BFAR: 00000000");
    assert_eq!(lines[13], "");
    assert_eq!(lines[14], "UFSR : INVSTATE");
    assert_eq!(lines[15], "");
    assert_eq!(lines[16], "");
    assert_eq!(lines.len(), 17);
}

#[test]
fn ibuserr_with_valid_bfar() {
    let snap = FaultStatusSnapshot::new(0x0000_8100, 0, 0x4002_0000);
    let report: Report = render(&sample_frame(), &snap).unwrap();
    assert!(report.contains("\nBFSR:  BFARVALID IBUSERR\nBFAR: 40020000\n\n"));
    assert!(snap.bfar_valid());
}

// ── Layout invariants ────────────────────────────────────────────────────────

#[test]
fn sections_appear_in_fixed_order() {
    let snap = FaultStatusSnapshot::new(0xFFFF_FFFF, 1, 2);
    let report: Report = render(&sample_frame(), &snap).unwrap();
    let positions = [
        "*** Fault occurred ***",
        "Stack Frame",
        "MMFSR:",
        "MMFAR:",
        "BFSR:",
        "BFAR:",
        "UFSR :",
    ]
    .map(|label| report.find(label).unwrap());
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
}

#[test]
fn stack_words_are_uppercase_hex() {
    let frame = ExceptionStackFrame::new([
        0xDEAD_BEEF,
        0xCAFE_F00D,
        0x0000_000A,
        0xABCD_EF01,
        0,
        0xFFFF_FFF9,
        0x0800_04C2,
        0x2100_0000,
    ]);
    let report: Report = render(&frame, &FaultStatusSnapshot::default()).unwrap();
    assert!(report.contains(
        "\nDEADBEEF CAFEF00D 0000000A ABCDEF01 00000000 FFFFFFF9 080004C2 21000000 \n"
    ));
}

#[test]
fn clear_snapshot_has_no_flag_names() {
    let report: Report = render(&sample_frame(), &FaultStatusSnapshot::default()).unwrap();
    assert!(report.contains("\nMMFSR:\n"));
    assert!(report.contains("\nBFSR: \n"));
    assert!(report.contains("\nUFSR :\n"));
}

#[test]
fn memmanage_data_access_violation() {
    let snap = FaultStatusSnapshot::new(0x0000_0082, 0x2001_FFFC, 0);
    let report: Report = render(&sample_frame(), &snap).unwrap();
    assert!(report.contains("\nMMFSR: MMARVALID DACCVIOL\nMMFAR: 2001FFFC\n\n"));
}

#[test]
fn stacking_errors_in_both_sub_registers() {
    // MSTKERR + STKERR: the stack pointer ran off the end of RAM.
    let snap = FaultStatusSnapshot::new(0x0000_1010, 0, 0);
    let report: Report = render(&sample_frame(), &snap).unwrap();
    assert!(report.contains("\nMMFSR: MSTKERR\n"));
    assert!(report.contains("\nBFSR:  STKERR\n"));
}

// ── Decoder bound to a register source ───────────────────────────────────────

#[test]
fn bound_decoder_matches_free_function() {
    let snap = FaultStatusSnapshot::new(0x0100_0000, 0, 0);
    let decoder = FaultDecoder::new(Scb(snap));

    let mut bound = Report::new();
    decoder.decode_frame(&sample_frame(), &mut bound).unwrap();

    let mut free = Report::new();
    decode(&sample_frame(), &snap, &mut free).unwrap();

    assert_eq!(bound, free);
    assert!(bound.contains("UFSR : UNALIGNED\n"));
}

#[test]
fn decode_through_dyn_write() {
    let snap = FaultStatusSnapshot::new(0x0200_0000, 0, 0);
    let mut text = Report::new();
    let sink: &mut dyn core::fmt::Write = &mut text;
    decode(&sample_frame(), &snap, sink).unwrap();
    assert!(text.contains("UFSR : DIVBYZERO\n"));
}
