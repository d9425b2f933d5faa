//! JSON graphs emitted by the coupling tools
//!
//! Both tools write `{ "nodes": [...], "edges": [...] }`. Keys are matched
//! in lower case or Pascal case; unknown keys are ignored.

use crate::graph::{CouplingGraph, GraphBuilder, GraphResult};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolNode {
    #[serde(alias = "Id")]
    pub id: String,
    #[serde(default, alias = "Label")]
    pub label: Option<String>,
    #[serde(default, alias = "Value")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolEdge {
    #[serde(default, alias = "Id")]
    pub id: Option<String>,
    #[serde(alias = "Start")]
    pub start: String,
    #[serde(alias = "End")]
    pub end: String,
    #[serde(alias = "Weight")]
    pub weight: f64,
    /// Informational; every edge is recorded `start -> end`.
    #[serde(default, alias = "Directed")]
    pub directed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CouplingJson {
    #[serde(default, alias = "Nodes")]
    pub nodes: Vec<ToolNode>,
    #[serde(default, alias = "Edges")]
    pub edges: Vec<ToolEdge>,
}

impl CouplingJson {
    pub fn parse(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Read and parse a tool result. A graph without nodes is an error.
    pub fn load(path: &Path, tool: &str) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let parsed = Self::parse(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if parsed.nodes.is_empty() {
            bail!("empty {} graph", tool);
        }
        Ok(parsed)
    }

    /// Build the engine graph: every node id first, then every edge.
    pub fn to_graph(&self) -> GraphResult<CouplingGraph> {
        let mut builder: GraphBuilder<&str> = GraphBuilder::new();
        for node in &self.nodes {
            builder.node(node.id.as_str());
        }
        for edge in &self.edges {
            builder.edge(edge.start.as_str(), edge.end.as_str(), edge.weight)?;
        }
        Ok(builder.build())
    }
}
