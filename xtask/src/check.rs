use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{self, OnFailure};

/// Crates that must build without std for the Cortex-M target.
const NO_STD_CRATES: &[&str] = &["platform", "acquisition", "bluetooth", "control", "firmware"];

const TARGET: &str = "thumbv7em-none-eabihf";

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for krate in NO_STD_CRATES {
        step::cargo(
            &format!("Checking {krate} (no_std, {TARGET})"),
            &["check", "-p", krate, "--target", TARGET, "--features", "defmt"],
            OnFailure::Abort,
        )?;
    }

    step::cargo(
        "Checking simulator (host)",
        &["check", "-p", "firmware", "--features", "emulator", "--bins"],
        OnFailure::Abort,
    )?;

    step::cargo(
        "Clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        OnFailure::Warn,
    )?;

    if step::cargo("Formatting", &["fmt", "--all", "--check"], OnFailure::Warn)?.is_none() {
        eprintln!("     Run 'cargo fmt --all' to fix");
    }

    step::finish("All checks", total_start);
    Ok(())
}
