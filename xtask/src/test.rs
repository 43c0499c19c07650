use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{self, OnFailure};

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    if !integration_only {
        if let Some(output) = step::cargo(
            "Unit tests",
            &["test", "--lib", "--workspace", "--exclude", "xtask"],
            OnFailure::Abort,
        )? {
            report(&output.stdout);
        }
    }

    if !unit_only {
        if let Some(output) = step::cargo(
            "Integration tests",
            &["test", "--tests", "--workspace", "--exclude", "xtask"],
            OnFailure::Abort,
        )? {
            report(&output.stdout);
        }
    }

    step::cargo("Doc tests", &["test", "--doc", "--workspace"], OnFailure::Warn)?;

    step::finish("All tests", total_start);
    Ok(())
}

fn report(stdout: &[u8]) {
    let output = String::from_utf8_lossy(stdout);
    let (passed, failed) = tally(&output);
    println!("     {passed} passed, {failed} failed");
    println!();
}

/// Sum the "N passed; M failed" counts over every test binary's summary line.
fn tally(output: &str) -> (u32, u32) {
    output
        .lines()
        .filter_map(|line| line.split("test result:").nth(1))
        .fold((0, 0), |(passed, failed), summary| {
            (
                passed.saturating_add(count(summary, "passed")),
                failed.saturating_add(count(summary, "failed")),
            )
        })
}

fn count(summary: &str, label: &str) -> u32 {
    summary
        .split(';')
        .find_map(|part| part.trim().strip_suffix(label))
        .and_then(|n| n.trim().trim_start_matches("ok.").trim_start_matches("FAILED.").trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_sums_every_summary_line() {
        let output = "\
running 3 tests
test result: ok. 3 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out

running 2 tests
test result: FAILED. 1 passed; 1 failed; 0 ignored; 0 measured; 0 filtered out
";
        assert_eq!(tally(output), (4, 1));
    }

    #[test]
    fn tally_without_summary_is_zero() {
        assert_eq!(tally("compiling..."), (0, 0));
    }
}
