//! Directed, weighted multigraph used by every estimator.
//!
//! Nodes live in an arena (petgraph `DiGraph`) and are addressed by a
//! stable index. Each edge is stored once and is visible from both ends:
//! as an outgoing edge of its source and an incoming edge of its target.

use super::{GraphError, GraphResult};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::FxHashSet;

/// Stable handle to a node of a [`CouplingGraph`].
pub type NodeId = NodeIndex;

/// Arena-backed directed multigraph with `f64` edge weights.
#[derive(Debug, Clone, Default)]
pub struct CouplingGraph {
    inner: DiGraph<(), f64>,
}

impl CouplingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            inner: DiGraph::with_capacity(nodes, edges),
        }
    }

    /// Allocate a new node with no edges.
    pub fn add_node(&mut self) -> NodeId {
        self.inner.add_node(())
    }

    /// Record a directed edge `from -> to`.
    ///
    /// Zero weights are legal and still count as connectivity.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> GraphResult<()> {
        let count = self.node_count();
        for node in [from, to] {
            if node.index() >= count {
                return Err(GraphError::NodeOutOfBounds(node.index(), count));
            }
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight(weight));
        }
        self.inner.add_edge(from, to, weight);
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// All nodes, in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.node_indices()
    }

    /// Incoming edges of `node` as `(source, weight)` pairs.
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.inner
            .edges_directed(node, Direction::Incoming)
            .map(|e| (e.source(), *e.weight()))
    }

    /// Outgoing edges of `node` as `(target, weight)` pairs.
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.inner
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (e.target(), *e.weight()))
    }

    pub fn in_count(&self, node: NodeId) -> usize {
        self.inner.edges_directed(node, Direction::Incoming).count()
    }

    pub fn out_count(&self, node: NodeId) -> usize {
        self.inner.edges_directed(node, Direction::Outgoing).count()
    }

    /// True when the node has neither incoming nor outgoing edges.
    pub fn is_isolated(&self, node: NodeId) -> bool {
        self.inner
            .edges_directed(node, Direction::Incoming)
            .next()
            .is_none()
            && self
                .inner
                .edges_directed(node, Direction::Outgoing)
                .next()
                .is_none()
    }

    /// Induced subgraph of every node with at least one edge.
    ///
    /// No edge is lost: an isolated node has none to lose. Surviving nodes
    /// keep their relative order.
    pub fn edge_only(&self) -> CouplingGraph {
        let inner = self.inner.filter_map(
            |node, _| (!self.is_isolated(node)).then_some(()),
            |_, weight| Some(*weight),
        );
        CouplingGraph { inner }
    }

    /// Number of distinct nodes one edge away from `node`, in either
    /// direction. A node that is both an in- and an out-neighbour counts
    /// once; a self-loop makes `node` its own neighbour.
    pub fn neighbourhood_size(&self, node: NodeId) -> usize {
        self.inner
            .neighbors_undirected(node)
            .collect::<FxHashSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (CouplingGraph, NodeId, NodeId) {
        let mut graph = CouplingGraph::new();
        let a = graph.add_node();
        let b = graph.add_node();
        (graph, a, b)
    }

    #[test]
    fn test_edge_visible_from_both_ends() {
        let (mut graph, a, b) = pair();
        graph.add_edge(a, b, 2.5).unwrap();

        assert_eq!(graph.out_edges(a).collect::<Vec<_>>(), vec![(b, 2.5)]);
        assert_eq!(graph.in_edges(b).collect::<Vec<_>>(), vec![(a, 2.5)]);
        assert_eq!(graph.in_count(a), 0);
        assert_eq!(graph.out_count(b), 0);
    }

    #[test]
    fn test_add_edge_out_of_bounds() {
        let (mut graph, a, _) = pair();
        let result = graph.add_edge(a, NodeIndex::new(7), 1.0);
        assert_eq!(result, Err(GraphError::NodeOutOfBounds(7, 2)));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_edge_rejects_bad_weights() {
        let (mut graph, a, b) = pair();
        assert!(matches!(
            graph.add_edge(a, b, -1.0),
            Err(GraphError::InvalidWeight(_))
        ));
        assert!(matches!(
            graph.add_edge(a, b, f64::NAN),
            Err(GraphError::InvalidWeight(_))
        ));
        assert!(matches!(
            graph.add_edge(a, b, f64::INFINITY),
            Err(GraphError::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_zero_weight_counts_as_connectivity() {
        let (mut graph, a, b) = pair();
        graph.add_edge(a, b, 0.0).unwrap();
        assert!(!graph.is_isolated(a));
        assert!(!graph.is_isolated(b));
        assert_eq!(graph.edge_only().node_count(), 2);
    }

    #[test]
    fn test_edge_only_drops_isolated_nodes() {
        let mut graph = CouplingGraph::new();
        let a = graph.add_node();
        let _lonely = graph.add_node();
        let c = graph.add_node();
        let _also_lonely = graph.add_node();
        graph.add_edge(a, c, 1.0).unwrap();
        graph.add_edge(c, a, 3.0).unwrap();

        let edges_only = graph.edge_only();
        assert_eq!(edges_only.node_count(), 2);
        assert_eq!(edges_only.edge_count(), 2);
        assert!(edges_only.nodes().all(|n| !edges_only.is_isolated(n)));
    }

    #[test]
    fn test_neighbourhood_counts_mutual_neighbour_once() {
        let mut graph = CouplingGraph::new();
        let a = graph.add_node();
        let b = graph.add_node();
        let c = graph.add_node();
        graph.add_edge(a, b, 1.0).unwrap();
        graph.add_edge(b, a, 1.0).unwrap();
        graph.add_edge(c, a, 1.0).unwrap();

        assert_eq!(graph.neighbourhood_size(a), 2);
        assert_eq!(graph.neighbourhood_size(b), 1);
        assert_eq!(graph.neighbourhood_size(c), 1);
    }

    #[test]
    fn test_neighbourhood_with_self_loop() {
        let mut graph = CouplingGraph::new();
        let a = graph.add_node();
        graph.add_edge(a, a, 1.0).unwrap();
        assert_eq!(graph.neighbourhood_size(a), 1);
        assert_eq!(graph.in_count(a), 1);
        assert_eq!(graph.out_count(a), 1);
    }
}
