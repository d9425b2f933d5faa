//! Clean command - remove the work directory

use crate::cache;
use anyhow::Result;
use std::path::Path;

pub fn run(work_dir: &Path, dry_run: bool) -> Result<()> {
    if !work_dir.exists() {
        println!("No work directory at {}.", work_dir.display());
        return Ok(());
    }

    let entries: Vec<_> = std::fs::read_dir(work_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();

    println!("Work directory {}:", work_dir.display());
    for entry in &entries {
        println!("  {}", entry.display());
    }

    if dry_run {
        println!("\nDry run - nothing removed. Run without --dry-run to delete.");
        return Ok(());
    }

    cache::invalidate(work_dir)?;
    println!("\nRemoved {}.", work_dir.display());
    Ok(())
}
