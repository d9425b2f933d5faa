//! On-disk state of a mining run
//!
//! Clones and tool outputs are kept in a work directory so later runs can
//! reuse them. The `--force-*` flags and `cgm clean` invalidate them.

pub mod paths;

pub use paths::{
    ensure_work_dir, get_gits_dir, get_repo_dir, get_tool_output_dir, repo_name,
    repo_name_from_url, DEFAULT_WORK_DIR,
};

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Remove a cached directory if it exists.
pub fn invalidate(dir: &Path) -> Result<()> {
    if dir.exists() {
        debug!("Removing {}", dir.display());
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to remove {}", dir.display()))?;
    }
    Ok(())
}
