//! Coupling-graph metrics (static coupling and git co-change coupling).

use super::{record_float, MetricOptions};
use crate::graph::{estimate_complexity, estimate_size, CouplingGraph, DegreeSummary, GraphResult};
use crate::models::MetricMap;
use std::fmt;
use tracing::debug;

/// Which tool produced a coupling graph. Decides the metric names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CouplingSource {
    /// StaticCouplingTool: `SumScd`, `SizeSct`, ...
    Static,
    /// GitCouplingTool: `SumGcd`, `SizeGct`, ...
    Git,
}

impl CouplingSource {
    fn degree_suffix(self) -> &'static str {
        match self {
            CouplingSource::Static => "Scd",
            CouplingSource::Git => "Gcd",
        }
    }

    fn graph_suffix(self) -> &'static str {
        match self {
            CouplingSource::Static => "Sct",
            CouplingSource::Git => "Gct",
        }
    }

    /// Name of a degree metric, e.g. `SumGcd`.
    pub fn degree_metric(self, stat: &str) -> String {
        format!("{}{}", stat, self.degree_suffix())
    }

    /// Name of a graph metric, e.g. `SizeSct`.
    pub fn graph_metric(self, estimate: &str) -> String {
        format!("{}{}", estimate, self.graph_suffix())
    }
}

impl fmt::Display for CouplingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CouplingSource::Static => write!(f, "static coupling"),
            CouplingSource::Git => write!(f, "git coupling"),
        }
    }
}

/// Compute `Sum/Max/Avg` coupling degree plus `Size` and `Complexity`.
///
/// Fails on an empty graph, whose average degree is undefined.
pub fn analyse_coupling_graph(
    graph: &CouplingGraph,
    source: CouplingSource,
    opts: MetricOptions,
) -> GraphResult<MetricMap> {
    debug!(
        "analysing {} graph: {} nodes, {} edges",
        source,
        graph.node_count(),
        graph.edge_count()
    );

    let summary = DegreeSummary::from_graph(graph);
    let mean = summary.mean()?;

    let mut metrics = MetricMap::new();
    let policy = opts.non_finite;
    record_float(&mut metrics, &source.degree_metric("Sum"), summary.sum, policy)?;
    record_float(&mut metrics, &source.degree_metric("Max"), summary.max, policy)?;
    record_float(&mut metrics, &source.degree_metric("Avg"), mean, policy)?;
    record_float(
        &mut metrics,
        &source.graph_metric("Size"),
        estimate_size(graph, opts.estimator),
        policy,
    )?;
    record_float(
        &mut metrics,
        &source.graph_metric("Complexity"),
        estimate_complexity(graph, opts.estimator),
        policy,
    )?;

    Ok(metrics)
}
