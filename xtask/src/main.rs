// Desktop/tooling crate — unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod decode;
mod flash;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Cortex-M fault decoder development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the crash demo and run it on hardware via probe-rs
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
        /// Crash to trigger after boot (e.g. invalid-state, precise-bus-error)
        #[arg(long)]
        crash: Option<String>,
    },
    /// Check the decoder (host + no_std target) and the firmware build
    Check,
    /// Run all tests (unit, integration, and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
        /// Cases per property test (sets PROPTEST_CASES)
        #[arg(long)]
        cases: Option<u32>,
    },
    /// Decode fault register values copied from a debugger session
    Decode(decode::DecodeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Flash { release, crash } => flash::run(release, crash.as_deref()),
        Commands::Check => check::run(),
        Commands::Test {
            unit,
            integration,
            cases,
        } => test::run(&test::TestPlan {
            unit,
            integration,
            proptest_cases: cases,
        }),
        Commands::Decode(args) => decode::run(&args),
    }
}
