use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

const CHIP: &str = "STM32H743ZITx";

pub fn run(release: bool, crash: Option<&str>) -> Result<()> {
    let mode = if release { "release" } else { "debug" };

    if let Some(name) = crash {
        if fault_firmware::CrashKind::from_name(name).is_none() {
            let known: Vec<&str> = fault_firmware::CrashKind::ALL
                .iter()
                .map(|kind| kind.name())
                .collect();
            anyhow::bail!("unknown crash `{name}`; expected one of: {}", known.join(", "));
        }
    }

    println!();
    println!(
        "{}",
        format!("🔨 Building crash demo ({mode} mode)...").cyan().bold()
    );
    println!();

    let build_start = Instant::now();
    let mut build_cmd = Command::new("cargo");
    build_cmd.args([
        "build",
        "-p",
        "fault-firmware",
        "--bin",
        "fault-demo",
        "--target",
        "thumbv7em-none-eabihf",
        "--features",
        "hardware",
    ]);

    if release {
        build_cmd.arg("--release");
    }
    // Read by option_env! in the firmware; cargo rebuilds when it changes.
    if let Some(name) = crash {
        build_cmd.env("FAULT_DEMO_CRASH", name);
    } else {
        build_cmd.env_remove("FAULT_DEMO_CRASH");
    }

    let build_output = build_cmd.output().context("Failed to run cargo build")?;

    if !build_output.status.success() {
        eprintln!("{}", "✗ Build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&build_output.stderr));
        anyhow::bail!("Build failed");
    }

    println!(
        "{}",
        format!(
            "✓ Build successful in {:.2}s",
            build_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();

    // probe-rs run flashes, then streams RTT until the core halts in the
    // fault handler (Ctrl+C to detach).
    println!("{}", format!("📡 Flashing to {CHIP}...").cyan().bold());
    println!("   {}", "Connecting to probe...".dimmed());

    let binary = format!("target/thumbv7em-none-eabihf/{mode}/fault-demo");
    let status = Command::new("probe-rs")
        .args(["run", &binary, "--chip", CHIP, "--probe-index", "0"])
        .status()
        .context("Failed to run probe-rs. Is probe-rs installed? (cargo install probe-rs-tools)")?;

    if !status.success() {
        anyhow::bail!("probe-rs exited with {status} - check that the probe is connected and the device is powered");
    }

    Ok(())
}
