//! Graph information-metric engine
//!
//! Turns an arbitrary weighted directed graph into a handful of
//! information-theoretic scalars: per-node coupling degree, estimated
//! graph size (bits) and estimated graph complexity.
//!
//! The engine is shared by every analysis (commit ancestry, static
//! coupling, git co-change coupling). It only ever sees fully resolved,
//! index-based graphs; identifier mapping happens in [`GraphBuilder`].
//!
//! # Example
//!
//! ```
//! use cgm::graph::{estimate_complexity, estimate_size, EstimatorOptions, GraphBuilder};
//!
//! let mut builder = GraphBuilder::new();
//! builder.node("a");
//! builder.node("b");
//! builder.edge("a", "b", 1.0).unwrap();
//! let graph = builder.build();
//!
//! let opts = EstimatorOptions::default();
//! let size = estimate_size(&graph, opts);
//! assert!((size + 2.0 * (2.0f64 / 3.0).log2()).abs() < 1e-12);
//! let _complexity = estimate_complexity(&graph, opts);
//! ```

mod builder;
mod degree;
mod estimate;
mod model;

pub use builder::GraphBuilder;
pub use degree::{coupling_degrees, DegreeSummary};
pub use estimate::{
    estimate_complexity, estimate_size, estimate_subsystem_size, EstimatorOptions,
};
pub use model::{CouplingGraph, NodeId};

use thiserror::Error;

/// Errors raised while building graphs or deriving metrics from them.
///
/// All of them are deterministic: recomputing on the same input yields
/// the same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node index {0} out of bounds (graph has {1} nodes)")]
    NodeOutOfBounds(usize, usize),

    #[error("Invalid edge weight {0}: weights must be finite and non-negative")]
    InvalidWeight(f64),

    #[error("Edge references unknown node '{id}'")]
    UnknownNode { id: String },

    #[error("Cannot average an empty degree sequence")]
    EmptyDegreeSequence,

    #[error("Metric {metric} is not finite ({value})")]
    NonFinite { metric: String, value: f64 },
}

pub type GraphResult<T> = Result<T, GraphError>;
