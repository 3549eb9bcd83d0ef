use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

const TARGET: &str = "thumbv7em-none-eabihf";

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    // Check 1: Decoder on the host (tests and xtask decode use this build)
    required_check(
        "decoder (host, std)",
        &["check", "-p", "fault-decoder", "--features", "std"],
    )?;

    // Check 2: Decoder on the target, no_std, without defmt
    required_check(
        "decoder (no_std, thumbv7em)",
        &["check", "-p", "fault-decoder", "--target", TARGET],
    )?;

    // Check 3: Firmware with the HardFault handler linked in
    required_check(
        "firmware (hardware, thumbv7em)",
        &[
            "check",
            "-p",
            "fault-firmware",
            "--target",
            TARGET,
            "--features",
            "hardware",
        ],
    )?;

    // Check 4: Clippy lints
    println!("{}", "  Running clippy lints...".cyan());
    let clippy_start = Instant::now();

    let clippy_output = Command::new("cargo")
        .args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
        .output()
        .context("Failed to run clippy")?;

    if clippy_output.status.success() {
        println!(
            "{}",
            format!(
                "  ✓ Clippy passed in {:.2}s",
                clippy_start.elapsed().as_secs_f64()
            )
            .green()
        );
    } else {
        eprintln!("{}", "  ⚠ Clippy warnings found".yellow().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&clippy_output.stderr));
        // Don't fail on clippy warnings, just show them
    }
    println!();

    // Check 5: Format check
    println!("{}", "  Checking code formatting...".cyan());

    let fmt_output = Command::new("cargo")
        .args(["fmt", "--all", "--check"])
        .output()
        .context("Failed to run cargo fmt")?;

    if fmt_output.status.success() {
        println!("{}", "  ✓ Formatting check passed".green());
    } else {
        eprintln!("{}", "  ⚠ Formatting issues found".yellow().bold());
        eprintln!("     Run 'cargo fmt --all' to fix");
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

/// Run one `cargo` invocation that must succeed, with timing output.
fn required_check(label: &str, args: &[&str]) -> Result<()> {
    println!("{}", format!("  Checking {label}...").cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to check {label}"))?;

    if !output.status.success() {
        eprintln!("{}", format!("  ✗ {label} check failed").red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{label} check failed");
    }

    println!(
        "{}",
        format!(
            "  ✓ {label} passed in {:.2}s",
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    Ok(())
}
