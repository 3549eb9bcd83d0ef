//! Property-based tests for the fault report.
//! Verifies the layout rules hold for ALL register and frame values, not just
//! the handful of faults seen on real boards.
#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use fault_decoder::{
    render, ExceptionStackFrame, FaultFlag, FaultStatusSnapshot, SubRegister, MAX_REPORT_LEN,
};
use proptest::prelude::*;

type Report = heapless::String<MAX_REPORT_LEN>;

/// The flag line for `sub`, without its label.
fn flag_names<'a>(report: &'a str, sub: SubRegister) -> &'a str {
    let label = sub.report_label();
    let start = report.find(label).unwrap() + label.len();
    let rest = &report[start..];
    &rest[..rest.find('\n').unwrap()]
}

fn frame_strategy() -> impl Strategy<Value = ExceptionStackFrame> {
    prop::array::uniform8(any::<u32>()).prop_map(ExceptionStackFrame::new)
}

proptest! {
    /// Printed flag names are exactly the set bits, in catalogue order.
    #[test]
    fn flag_lines_list_exactly_the_set_bits(cfsr in any::<u32>()) {
        let snap = FaultStatusSnapshot::new(cfsr, 0, 0);
        let report: Report = render(&ExceptionStackFrame::default(), &snap).unwrap();

        for sub in SubRegister::ALL {
            let printed: Vec<&str> = flag_names(&report, sub).split_whitespace().collect();
            let expected: Vec<&str> = sub
                .flags()
                .iter()
                .filter(|flag| cfsr & flag.mask() != 0)
                .map(|flag| flag.name())
                .collect();
            prop_assert_eq!(printed, expected);
        }
    }

    /// A zero sub-register byte range prints its label and nothing else.
    #[test]
    fn zero_sub_register_prints_no_names(cfsr in any::<u32>(), pick in 0usize..3) {
        let sub = SubRegister::ALL[pick];
        let cfsr = cfsr & !sub.field_mask();
        let snap = FaultStatusSnapshot::new(cfsr, 0, 0);
        let report: Report = render(&ExceptionStackFrame::default(), &snap).unwrap();
        prop_assert_eq!(flag_names(&report, sub).trim(), "");
    }

    /// The stack line has exactly 8 tokens of 8 uppercase hex digits, in order.
    #[test]
    fn stack_line_is_eight_fixed_width_words(frame in frame_strategy()) {
        let report: Report = render(&frame, &FaultStatusSnapshot::default()).unwrap();
        let line = report.split('\n').nth(6).unwrap();
        let tokens: Vec<&str> = line.split_whitespace().collect();

        prop_assert_eq!(tokens.len(), 8);
        for (token, word) in tokens.iter().zip(frame.words()) {
            prop_assert_eq!(token.len(), 8);
            prop_assert!(token.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
            prop_assert_eq!(u32::from_str_radix(token, 16).unwrap(), *word);
        }
    }

    /// MMFAR and BFAR are printed verbatim whatever their validity bits say.
    #[test]
    fn address_registers_printed_verbatim(
        cfsr in any::<u32>(),
        mmfar in any::<u32>(),
        bfar in any::<u32>(),
    ) {
        let snap = FaultStatusSnapshot::new(cfsr, mmfar, bfar);
        let report: Report = render(&ExceptionStackFrame::default(), &snap).unwrap();
        let mmfar_line = format!("\nMMFAR: {mmfar:08X}\n\n");
        let bfar_line = format!("\nBFAR: {bfar:08X}\n\n");
        prop_assert!(report.contains(&mmfar_line));
        prop_assert!(report.contains(&bfar_line));
    }

    /// Decoding twice gives byte-identical output.
    #[test]
    fn decode_is_idempotent(
        frame in frame_strategy(),
        cfsr in any::<u32>(),
        mmfar in any::<u32>(),
        bfar in any::<u32>(),
    ) {
        let snap = FaultStatusSnapshot::new(cfsr, mmfar, bfar);
        let first: Report = render(&frame, &snap).unwrap();
        let second: Report = render(&frame, &snap).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Every report fits in MAX_REPORT_LEN.
    #[test]
    fn report_never_exceeds_max_len(frame in frame_strategy(), cfsr in any::<u32>()) {
        let snap = FaultStatusSnapshot::new(cfsr, 0, 0);
        prop_assert!(render::<MAX_REPORT_LEN>(&frame, &snap).is_ok());
    }

    /// active_flags agrees with the per-flag bit test.
    #[test]
    fn active_flags_match_is_set(cfsr in any::<u32>()) {
        let snap = FaultStatusSnapshot::new(cfsr, 0, 0);
        let active: Vec<FaultFlag> = snap.active_flags().collect();
        let expected: Vec<FaultFlag> =
            FaultFlag::ALL.into_iter().filter(|flag| flag.is_set(cfsr)).collect();
        prop_assert_eq!(active, expected);
    }
}
