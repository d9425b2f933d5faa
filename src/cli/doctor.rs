//! Doctor command - check environment

use crate::config::MiningOptions;
use anyhow::{bail, Result};
use console::style;

fn check(label: &str, command: &str) -> bool {
    match which::which(command) {
        Ok(path) => {
            println!("{}{}: {}", style("✓ ").green(), label, path.display());
            true
        }
        Err(_) => {
            println!(
                "{}{}: {} not found on PATH",
                style("✗ ").red(),
                label,
                style(command).bold()
            );
            false
        }
    }
}

pub fn run(opts: &MiningOptions) -> Result<()> {
    println!("cgm doctor\n");

    let checks = [
        ("git", "git"),
        ("shell", "sh"),
        ("StaticCouplingTool", opts.tools.sct.as_str()),
        ("GitCouplingTool", opts.tools.gct.as_str()),
    ];
    let failed = checks
        .iter()
        .filter(|(label, command)| !check(label, command))
        .count();

    let work_dir = &opts.work_dir;
    if work_dir.exists() {
        println!("{}work directory: {}", style("✓ ").green(), work_dir.display());
    } else {
        println!(
            "{}work directory: {} (created on first run)",
            style("○ ").dim(),
            work_dir.display()
        );
    }

    if failed > 0 {
        bail!("{} check(s) failed", failed);
    }
    println!("\nAll checks passed!");
    Ok(())
}
