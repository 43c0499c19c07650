use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{self, OnFailure};

/// Crates whose API docs are built. `--open` shows the first.
const DOC_CRATES: &[&str] = &["firmware", "platform", "acquisition", "bluetooth", "control"];

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building documentation...".cyan().bold());
    println!();

    let start = Instant::now();

    let mut args = vec!["doc", "--no-deps", "--document-private-items"];
    for krate in DOC_CRATES {
        args.extend(["-p", krate]);
    }
    if open {
        args.push("--open");
    }
    step::cargo("Documentation", &args, OnFailure::Abort)?;

    if !open {
        println!(
            "   {}",
            "Start at target/doc/firmware/index.html; run 'cargo xtask doc --open' to open it".dimmed()
        );
        println!();
    }

    step::finish("Documentation", start);
    Ok(())
}
