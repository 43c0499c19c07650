use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;

pub fn run(release: bool, log: &str) -> Result<()> {
    println!();
    println!("{}", "📡 Starting acquisition simulator...".cyan().bold());
    println!("   {}", "ON / START on stdin, 'ble <cmd>' for wireless writes".dimmed());
    println!();

    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-p", "firmware", "--bin", "simulator", "--features", "emulator"])
        .env("RUST_LOG", log);
    if release {
        cmd.arg("--release");
    }

    let status = cmd.status().context("Failed to start simulator")?;
    if !status.success() {
        anyhow::bail!("Simulator exited with {status}");
    }
    Ok(())
}
