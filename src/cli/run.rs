//! Mining run: load repositories, analyse them in parallel, write the report

use crate::analysis::analyse_history;
use crate::cache::{ensure_work_dir, repo_name};
use crate::config::MiningOptions;
use crate::git::{load_repos, GitHistory};
use crate::input::parse_input;
use crate::models::{MiningReport, RepoReport};
use crate::tools::{run_tool_analysis, CouplingTool, GitCouplingTool, StaticCouplingTool};
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

pub fn run(input: &Path, output: &Path, opts: &MiningOptions) -> Result<()> {
    let start = Instant::now();
    let specs = parse_input(input)?;
    info!("{} repositories in {}", specs.len(), input.display());

    ensure_work_dir(&opts.work_dir)
        .with_context(|| format!("Failed to create {}", opts.work_dir.display()))?;

    let repos = load_repos(&specs, opts);
    let report = mine_repos(&repos, opts)?;

    report
        .save(output)
        .with_context(|| format!("saving results to {}", output.display()))?;

    eprintln!(
        "{}Mined {}/{} repositories in {:.1}s, results in {}",
        style("✓ ").green(),
        style(report.len()).cyan(),
        specs.len(),
        start.elapsed().as_secs_f64(),
        style(output.display()).bold()
    );
    Ok(())
}

fn progress_bar(len: usize, opts: &MiningOptions) -> Result<Option<ProgressBar>> {
    if opts.verbosity != 1 || !console::Term::stderr().is_term() {
        return Ok(None);
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓▒░  "),
    );
    Ok(Some(bar))
}

/// Analyse every cloned repository. A repository whose analysis fails is
/// logged and left out of the report.
pub fn mine_repos(repos: &[PathBuf], opts: &MiningOptions) -> Result<MiningReport> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.workers)
        .build()?;

    let sct = StaticCouplingTool::new(&opts.tools.sct, &opts.tools.sct_language);
    let gct = GitCouplingTool::new(
        &opts.tools.gct,
        opts.tools.gct_file_types.clone(),
        opts.tools.gct_min_cochanges,
    );
    let bar = progress_bar(repos.len(), opts)?;
    let total = repos.len();

    let results: Vec<(String, RepoReport)> = pool.install(|| {
        repos
            .par_iter()
            .enumerate()
            .filter_map(|(i, repo)| {
                let name = repo_name(repo);
                info!("[{}/{}] analysing {}", i + 1, total, name);
                let result = mine_repo(repo, &sct, &gct, opts);
                if let Some(bar) = &bar {
                    bar.set_message(name.clone());
                    bar.inc(1);
                }
                match result {
                    Ok(report) => Some((name, report)),
                    Err(e) => {
                        error!("{}: {:#}", name, e);
                        None
                    }
                }
            })
            .collect()
    });

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let mut report = MiningReport::new();
    for (name, repo_report) in results {
        report.insert(name, repo_report);
    }
    Ok(report)
}

/// Run every enabled analysis on one repository. Stops at the first failure.
pub fn mine_repo(
    repo: &Path,
    sct: &dyn CouplingTool,
    gct: &dyn CouplingTool,
    opts: &MiningOptions,
) -> Result<RepoReport> {
    let mut report = RepoReport::default();

    if !opts.skip_git {
        let history = GitHistory::open(repo)?;
        report.git = Some(analyse_history(&history, opts.metrics).context("git analysis failed")?);
    }
    if !opts.skip_sct {
        report.sct = Some(run_tool_analysis(sct, repo, opts, opts.force_sct)?);
    }
    if !opts.skip_gct {
        report.gct = Some(run_tool_analysis(gct, repo, opts, opts.force_gct)?);
    }

    Ok(report)
}
