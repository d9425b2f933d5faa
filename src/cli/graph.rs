//! Graph command - coupling metrics for an existing tool result

use super::ToolKind;
use crate::analysis::{analyse_coupling_graph, CouplingSource};
use crate::config::MiningOptions;
use crate::tools::CouplingJson;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run(file: &Path, tool: ToolKind, opts: &MiningOptions) -> Result<()> {
    let (name, source) = match tool {
        ToolKind::Sct => ("sct", CouplingSource::Static),
        ToolKind::Gct => ("gct", CouplingSource::Git),
    };

    let json = CouplingJson::load(file, name)?;
    let graph = json
        .to_graph()
        .with_context(|| format!("Malformed {} graph in {}", name, file.display()))?;
    let metrics = analyse_coupling_graph(&graph, source, opts.metrics)
        .with_context(|| format!("{} analysis failed", source))?;

    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}
