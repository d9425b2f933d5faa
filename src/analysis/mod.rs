//! Metric extraction on top of the graph engine
//!
//! - `coupling`: degree, size and complexity metrics for static-coupling
//!   and git-coupling graphs
//! - `commit`: contributor, branch and commit-graph metrics for a git history

pub mod commit;
pub mod coupling;

pub use commit::{analyse_history, HistoryStats};
pub use coupling::{analyse_coupling_graph, CouplingSource};

use crate::graph::{EstimatorOptions, GraphError, GraphResult};
use crate::models::MetricMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What to do with a metric that evaluates to NaN or an infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonFinitePolicy {
    /// Log a warning and store the metric as `null`.
    #[default]
    Record,
    /// Fail the analysis.
    Fail,
}

/// Settings shared by every analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricOptions {
    pub estimator: EstimatorOptions,
    pub non_finite: NonFinitePolicy,
}

/// Store a float metric, applying the non-finite policy.
pub(crate) fn record_float(
    metrics: &mut MetricMap,
    name: &str,
    value: f64,
    policy: NonFinitePolicy,
) -> GraphResult<()> {
    if !value.is_finite() {
        match policy {
            NonFinitePolicy::Fail => {
                return Err(GraphError::NonFinite {
                    metric: name.to_string(),
                    value,
                })
            }
            NonFinitePolicy::Record => warn!("{} is not finite ({}), recording null", name, value),
        }
    }
    metrics.insert_float(name, value);
    Ok(())
}
