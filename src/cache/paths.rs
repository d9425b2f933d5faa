//! Work directory layout - clones and tool outputs live under `.mp/` by default
//!
//! ```text
//! <work_dir>/gits/<repo>      cloned repositories
//! <work_dir>/sct/<repo>/      StaticCouplingTool output
//! <work_dir>/gct/<repo>/      GitCouplingTool output
//! ```

use std::path::{Path, PathBuf};

/// Default work directory, relative to the current directory.
pub const DEFAULT_WORK_DIR: &str = ".mp";

/// Directory holding every cloned repository.
pub fn get_gits_dir(work_dir: &Path) -> PathBuf {
    work_dir.join("gits")
}

/// Clone directory for a repository URL.
pub fn get_repo_dir(work_dir: &Path, url: &str) -> PathBuf {
    get_gits_dir(work_dir).join(repo_name_from_url(url))
}

/// Output directory of `tool` (e.g. `sct`) for the repository at `repo_path`.
pub fn get_tool_output_dir(work_dir: &Path, tool: &str, repo_path: &Path) -> PathBuf {
    work_dir.join(tool).join(repo_name(repo_path))
}

/// Last path segment of a clone URL without a `.git` suffix.
pub fn repo_name_from_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let base = trimmed
        .rsplit(|c| c == '/' || c == ':')
        .next()
        .unwrap_or(trimmed);
    base.strip_suffix(".git").unwrap_or(base).to_string()
}

/// Name used to key a repository in reports and tool output directories.
pub fn repo_name(repo_path: &Path) -> String {
    repo_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "repo".to_string())
}

/// Ensure the work directory exists.
pub fn ensure_work_dir(work_dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(get_gits_dir(work_dir))?;
    Ok(work_dir.to_path_buf())
}
