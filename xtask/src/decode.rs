//! Host-side decoding of fault register values.
//!
//! For boards where the report never made it to the console: halt the core
//! in a debugger, copy CFSR/MMFAR/BFAR (0xE000ED28/34/38) and the eight
//! stacked words, and feed them in here. The output is the same text the
//! firmware would have printed.

use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use fault_decoder::mocks::MockRegisters;
use fault_decoder::{ExceptionStackFrame, FaultDecoder, FaultFlag, RegisterSource, MAX_REPORT_LEN};

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Configurable Fault Status Register (hex, `0x` optional)
    #[arg(long, value_parser = parse_hex)]
    pub cfsr: u32,
    /// MemManage Fault Address Register
    #[arg(long, value_parser = parse_hex, default_value = "0")]
    pub mmfar: u32,
    /// BusFault Address Register
    #[arg(long, value_parser = parse_hex, default_value = "0")]
    pub bfar: u32,
    /// Stacked R0,R1,R2,R3,R12,LR,PC,xPSR, comma separated. All zero if omitted.
    #[arg(long, value_parser = parse_hex, value_delimiter = ',')]
    pub frame: Vec<u32>,
}

pub fn run(args: &DecodeArgs) -> Result<()> {
    let frame = if args.frame.is_empty() {
        ExceptionStackFrame::default()
    } else {
        ExceptionStackFrame::try_from(args.frame.as_slice()).map_err(|e| anyhow!("--frame: {e}"))?
    };

    let decoder = FaultDecoder::new(MockRegisters::new(args.cfsr, args.mmfar, args.bfar));
    let mut report = String::with_capacity(MAX_REPORT_LEN);
    decoder
        .decode_frame(&frame, &mut report)
        .map_err(|_| anyhow!("formatting the report failed"))?;

    print!("{report}");

    let snapshot = decoder.source().snapshot();
    if snapshot.is_clear() {
        println!("{}", "No fault status bits set.".yellow());
    }
    let unknown = args.cfsr & !FaultFlag::CATALOGUE_MASK;
    if unknown != 0 {
        println!(
            "{}",
            format!("CFSR bits 0x{unknown:08X} are reserved and not shown above").yellow()
        );
    }

    Ok(())
}

/// Parse a 32-bit hex word, with or without `0x`, `_` separators allowed.
fn parse_hex(text: &str) -> Result<u32, String> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .replace('_', "");
    u32::from_str_radix(&digits, 16).map_err(|e| format!("`{text}` is not a 32-bit hex value: {e}"))
}
