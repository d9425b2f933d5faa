//! External coupling tools
//!
//! The StaticCouplingTool and the GitCouplingTool are separate programs.
//! Each is run on a cloned repository, writes a JSON graph into its output
//! directory, and that graph is fed to the metric engine.
//!
//! Tool outputs are cached in the work directory. A cached result is
//! reused unless it fails to parse or a rerun is forced.

mod gct;
mod schema;
mod sct;

pub use gct::GitCouplingTool;
pub use schema::{CouplingJson, ToolEdge, ToolNode};
pub use sct::StaticCouplingTool;

use crate::analysis::{analyse_coupling_graph, CouplingSource};
use crate::cache::{self, get_tool_output_dir};
use crate::config::MiningOptions;
use crate::models::MetricMap;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Lines of stderr kept in the error of a failed command.
const STDERR_TAIL_LINES: usize = 20;

/// A program that turns a repository into a coupling graph.
pub trait CouplingTool: Send + Sync {
    /// Which metric family the graph feeds.
    fn source(&self) -> CouplingSource;

    /// Short name, also the output subdirectory (`sct`, `gct`).
    fn name(&self) -> &'static str;

    /// Location of the JSON result inside the tool's output directory.
    fn result_file(&self, out_dir: &Path) -> PathBuf;

    /// Command analysing `repo` and writing into `out_dir`.
    fn command(&self, repo: &Path, out_dir: &Path) -> Command;
}

/// Run `tool` on `repo` (or reuse its cached output) and compute the
/// coupling metrics of the resulting graph.
pub fn run_tool_analysis(
    tool: &dyn CouplingTool,
    repo: &Path,
    opts: &MiningOptions,
    force: bool,
) -> Result<MetricMap> {
    let out_dir = get_tool_output_dir(&opts.work_dir, tool.name(), repo);
    let result_file = tool.result_file(&out_dir);

    if result_file.exists() {
        if force {
            cache::invalidate(&out_dir)?;
        } else {
            debug!("parsing old {} result", tool.name());
            match CouplingJson::load(&result_file, tool.name()) {
                Ok(json) => {
                    debug!("using old result for analysis");
                    return analyse_output(tool, &json, opts);
                }
                Err(e) => {
                    debug!("parsing failed: {:#}", e);
                    cache::invalidate(&out_dir)?;
                }
            }
        }
    }

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    debug!("running {}", tool.name());
    let mut command = tool.command(repo, &out_dir);
    if let Err(e) = run_command(&mut command, opts.passthrough()) {
        if let Err(cleanup) = cache::invalidate(&out_dir) {
            warn!("{:#}", cleanup);
        }
        return Err(e.context(format!("{} failed on {}", tool.name(), repo.display())));
    }

    debug!("parsing {} output", tool.name());
    let json = CouplingJson::load(&result_file, tool.name())?;
    analyse_output(tool, &json, opts)
}

fn analyse_output(
    tool: &dyn CouplingTool,
    json: &CouplingJson,
    opts: &MiningOptions,
) -> Result<MetricMap> {
    debug!("analysing {} output", tool.name());
    let graph = json
        .to_graph()
        .with_context(|| format!("Malformed {} graph", tool.name()))?;
    let metrics = analyse_coupling_graph(&graph, tool.source(), opts.metrics)
        .with_context(|| format!("{} analysis failed", tool.source()))?;
    Ok(metrics)
}

/// Run a child process to completion.
///
/// With `passthrough` the child shares our stdio; otherwise its output is
/// captured and the tail of stderr is attached to the error.
pub fn run_command(cmd: &mut Command, passthrough: bool) -> Result<()> {
    debug!("executing: {:?}", cmd);
    let program = cmd.get_program().to_string_lossy().to_string();

    if passthrough {
        let status = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("Failed to start {}", program))?;
        if !status.success() {
            bail!("{} exited with {}", program, status);
        }
        return Ok(());
    }

    let output = cmd
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to start {}", program))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let lines: Vec<&str> = stderr.lines().collect();
        let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
        bail!("{} exited with {}\n{}", program, output.status, tail.trim_end());
    }
    Ok(())
}
