//! Cloning and building the repositories to mine

use crate::cache::{self, get_repo_dir};
use crate::config::MiningOptions;
use crate::git::GitHistory;
use crate::input::RepoSpec;
use crate::tools::run_command;
use anyhow::{Context, Result};
use git2::Repository;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, error, info};

/// Clone (or reuse) and build every repository. Failing repositories are
/// logged and left out.
pub fn load_repos(specs: &[RepoSpec], opts: &MiningOptions) -> Vec<PathBuf> {
    let total = specs.len();
    let mut repos = Vec::with_capacity(total);

    for (i, spec) in specs.iter().enumerate() {
        info!("[{}/{}] loading {}", i + 1, total, spec.url);
        match load_repo(spec, opts) {
            Ok(path) => repos.push(path),
            Err(e) => error!("loading {} failed: {:#}", spec.url, e),
        }
    }

    repos
}

/// Clone and build one repository, returning its clone directory.
pub fn load_repo(spec: &RepoSpec, opts: &MiningOptions) -> Result<PathBuf> {
    let dir = get_repo_dir(&opts.work_dir, &spec.url);

    if dir.exists() {
        if opts.force_git {
            cache::invalidate(&dir)?;
        } else if GitHistory::is_git_repo(&dir) {
            debug!("reusing clone at {}", dir.display());
            return Ok(dir);
        } else {
            debug!("{} is not a repository, recloning", dir.display());
            cache::invalidate(&dir)?;
        }
    }

    let prepared = clone_repo(&spec.url, &dir).and_then(|()| {
        if opts.skip_build {
            Ok(())
        } else {
            build_repo(&dir, &spec.build_command, opts.passthrough())
        }
    });

    if let Err(e) = prepared {
        if let Err(cleanup) = cache::invalidate(&dir) {
            error!("{:#}", cleanup);
        }
        return Err(e);
    }
    Ok(dir)
}

/// Clone `url` into `dir`.
pub fn clone_repo(url: &str, dir: &Path) -> Result<()> {
    debug!("cloning {} into {}", url, dir.display());
    if let Some(parent) = dir.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Repository::clone(url, dir).with_context(|| format!("Failed to clone {}", url))?;
    Ok(())
}

/// Run the build command through `sh -c` inside the clone.
pub fn build_repo(dir: &Path, command: &str, passthrough: bool) -> Result<()> {
    debug!("building {}", dir.display());
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).current_dir(dir);
    run_command(&mut cmd, passthrough).with_context(|| format!("Build failed in {}", dir.display()))
}
