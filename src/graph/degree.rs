//! Coupling degree: the summed weight of every edge touching a node.

use super::{CouplingGraph, GraphError, GraphResult};

/// Per-node coupling degree (in + out edge weights), indexed by
/// `NodeId::index()`.
pub fn coupling_degrees(graph: &CouplingGraph) -> Vec<f64> {
    graph
        .nodes()
        .map(|node| {
            let incoming: f64 = graph.in_edges(node).map(|(_, w)| w).sum();
            let outgoing: f64 = graph.out_edges(node).map(|(_, w)| w).sum();
            incoming + outgoing
        })
        .collect()
}

/// Sum, maximum and count of a degree sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DegreeSummary {
    pub sum: f64,
    pub max: f64,
    pub count: usize,
}

impl DegreeSummary {
    pub fn from_degrees(degrees: &[f64]) -> Self {
        // Degrees are non-negative, so 0.0 is a safe floor for the maximum.
        degrees.iter().fold(Self::default(), |acc, &d| Self {
            sum: acc.sum + d,
            max: acc.max.max(d),
            count: acc.count + 1,
        })
    }

    pub fn from_graph(graph: &CouplingGraph) -> Self {
        Self::from_degrees(&coupling_degrees(graph))
    }

    /// Arithmetic mean. An empty sequence has no mean, which is reported
    /// as an error rather than as zero.
    pub fn mean(&self) -> GraphResult<f64> {
        if self.count == 0 {
            return Err(GraphError::EmptyDegreeSequence);
        }
        Ok(self.sum / self.count as f64)
    }
}
