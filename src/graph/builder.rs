//! Identifier-keyed, two-pass graph construction.
//!
//! External sources name their nodes (tool ids, commit hashes). The
//! builder maps every key to an arena index first, then resolves edges
//! against that map, so the estimators only ever see index-based graphs.

use super::{CouplingGraph, GraphError, GraphResult, NodeId};
use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::fmt::Display;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct GraphBuilder<K> {
    graph: CouplingGraph,
    index: FxHashMap<K, NodeId>,
}

impl<K: Eq + Hash> GraphBuilder<K> {
    pub fn new() -> Self {
        Self {
            graph: CouplingGraph::new(),
            index: FxHashMap::default(),
        }
    }

    /// Get the node for `key`, allocating it on first sight.
    ///
    /// Repeated keys collapse onto the same node.
    pub fn node(&mut self, key: K) -> NodeId {
        let graph = &mut self.graph;
        *self.index.entry(key).or_insert_with(|| graph.add_node())
    }

    /// Look up a previously allocated node.
    pub fn get<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    /// Add an edge between two already known keys.
    ///
    /// Fails with [`GraphError::UnknownNode`] if either key was never
    /// passed to [`GraphBuilder::node`].
    pub fn edge<Q>(&mut self, from: &Q, to: &Q, weight: f64) -> GraphResult<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        let start = self.resolve(from)?;
        let end = self.resolve(to)?;
        self.graph.add_edge(start, end, weight)
    }

    /// Add an edge, allocating either end if it is new.
    pub fn link(&mut self, from: K, to: K, weight: f64) -> GraphResult<()> {
        let start = self.node(from);
        let end = self.node(to);
        self.graph.add_edge(start, end, weight)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn build(self) -> CouplingGraph {
        self.graph
    }

    fn resolve<Q>(&self, key: &Q) -> GraphResult<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        self.get(key).ok_or_else(|| GraphError::UnknownNode {
            id: key.to_string(),
        })
    }
}

impl<K: Eq + Hash> Default for GraphBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}
