//! Commit-history metrics
//!
//! Builds the commit-ancestry graph (child -> parent, weight 1.0) and
//! gathers contributor and branch statistics while walking the history.

use super::{record_float, MetricOptions};
use crate::git::history::{CommitRecord, GitHistory};
use crate::graph::{estimate_complexity, estimate_size, GraphBuilder, GraphResult};
use crate::models::MetricMap;
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use git2::Oid;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Accumulated state of a history walk.
pub struct HistoryStats {
    graph: GraphBuilder<Oid>,
    authors: FxHashMap<String, u64>,
    commit_count: u64,
    branch_count: u64,
    seen_parents: FxHashSet<Oid>,
    first: Option<DateTime<Utc>>,
    last: Option<DateTime<Utc>>,
}

impl Default for HistoryStats {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStats {
    pub fn new() -> Self {
        Self {
            graph: GraphBuilder::new(),
            authors: FxHashMap::default(),
            commit_count: 0,
            branch_count: 1,
            seen_parents: FxHashSet::default(),
            first: None,
            last: None,
        }
    }

    /// Add one commit. Merge commits only contribute to the graph and the
    /// lifetime.
    pub fn record(&mut self, commit: &CommitRecord) -> GraphResult<()> {
        self.first = Some(self.first.map_or(commit.time, |t| t.min(commit.time)));
        self.last = Some(self.last.map_or(commit.time, |t| t.max(commit.time)));

        self.graph.node(commit.id);
        for parent in &commit.parents {
            self.graph.link(commit.id, *parent, 1.0)?;
        }

        if commit.is_merge() {
            return Ok(());
        }

        *self.authors.entry(commit.author.clone()).or_default() += 1;
        self.commit_count += 1;
        for parent in &commit.parents {
            // a parent with a second non-merge child is a branch point
            if !self.seen_parents.insert(*parent) {
                self.branch_count += 1;
            }
        }
        Ok(())
    }

    pub fn commit_count(&self) -> u64 {
        self.commit_count
    }

    pub fn branch_count(&self) -> u64 {
        self.branch_count
    }

    pub fn contributor_count(&self) -> usize {
        self.authors.len()
    }

    /// Shannon entropy (bits) of the commits-per-author distribution.
    pub fn contributor_entropy(&self) -> f64 {
        let total = self.commit_count as f64;
        self.authors
            .values()
            .map(|&n| {
                let p = n as f64 / total;
                -p * p.log2()
            })
            .sum()
    }

    /// Hours between the earliest and the latest author timestamp.
    pub fn lifetime_hours(&self) -> f64 {
        match (self.first, self.last) {
            (Some(first), Some(last)) => (last - first).num_seconds() as f64 / 3600.0,
            _ => 0.0,
        }
    }

    /// Finish the walk and produce the `Git` metric record.
    pub fn into_metrics(self, file_count: usize, opts: MetricOptions) -> Result<MetricMap> {
        if self.commit_count == 0 {
            bail!("history has no non-merge commits");
        }

        let mut metrics = MetricMap::new();
        let policy = opts.non_finite;
        let commits = self.commit_count as f64;

        metrics.insert_count("ContributorCount", self.contributor_count() as u64);
        record_float(
            &mut metrics,
            "ContributorEntropy",
            self.contributor_entropy(),
            policy,
        )?;
        metrics.insert_count("CommitCount", self.commit_count);
        metrics.insert_count("BranchCount", self.branch_count);
        metrics.insert_count("FileCount", file_count as u64);
        record_float(&mut metrics, "Lifetime", self.lifetime_hours(), policy)?;
        record_float(
            &mut metrics,
            "AvgContributorCommits",
            commits / self.contributor_count() as f64,
            policy,
        )?;
        record_float(
            &mut metrics,
            "AvgBranchCommits",
            commits / self.branch_count as f64,
            policy,
        )?;

        let graph = self.graph.build();
        debug!(
            "commit graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        record_float(
            &mut metrics,
            "GitSize",
            estimate_size(&graph, opts.estimator),
            policy,
        )?;
        record_float(
            &mut metrics,
            "GitComplexity",
            estimate_complexity(&graph, opts.estimator),
            policy,
        )?;

        Ok(metrics)
    }
}

/// Commit metrics of an opened repository.
pub fn analyse_history(history: &GitHistory, opts: MetricOptions) -> Result<MetricMap> {
    let commits = history.commit_records()?;
    debug!("analysing {} commits", commits.len());

    let mut stats = HistoryStats::new();
    for commit in &commits {
        stats.record(commit)?;
    }

    let file_count = history.tracked_files()?.len();
    stats.into_metrics(file_count, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::NonFinitePolicy;
    use crate::git::history::tests::{commit_file, create_test_repo};
    use crate::graph::EstimatorOptions;
    use chrono::TimeZone;

    fn oid(n: u32) -> Oid {
        Oid::from_str(&format!("{:040x}", n)).unwrap()
    }

    fn commit(id: u32, parents: &[u32], author: &str, hour: i64) -> CommitRecord {
        CommitRecord {
            id: oid(id),
            parents: parents.iter().map(|&p| oid(p)).collect(),
            author: author.to_string(),
            time: Utc.timestamp_opt(hour * 3600, 0).unwrap(),
        }
    }

    /// 1 <- 2 <- 4 (merge of 2 and 3), 1 <- 3
    fn branched_history() -> Vec<CommitRecord> {
        vec![
            commit(4, &[2, 3], "alice", 30),
            commit(3, &[1], "bob", 20),
            commit(2, &[1], "alice", 10),
            commit(1, &[], "alice", 0),
        ]
    }

    #[test]
    fn test_counts_skip_merges() {
        let mut stats = HistoryStats::new();
        for c in branched_history() {
            stats.record(&c).unwrap();
        }

        assert_eq!(stats.commit_count(), 3);
        assert_eq!(stats.contributor_count(), 2);
        // 1 is the parent of both 2 and 3
        assert_eq!(stats.branch_count(), 2);
        assert_eq!(stats.lifetime_hours(), 30.0);
    }

    #[test]
    fn test_contributor_entropy() {
        let mut stats = HistoryStats::new();
        for c in branched_history() {
            stats.record(&c).unwrap();
        }
        let (p, q) = (2.0f64 / 3.0, 1.0f64 / 3.0);
        let expected = -p * p.log2() - q * q.log2();
        assert!((stats.contributor_entropy() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_author_has_zero_entropy() {
        let mut stats = HistoryStats::new();
        stats.record(&commit(1, &[], "alice", 0)).unwrap();
        stats.record(&commit(2, &[1], "alice", 5)).unwrap();
        assert_eq!(stats.contributor_entropy(), 0.0);
    }

    #[test]
    fn test_metric_record() {
        let mut stats = HistoryStats::new();
        for c in branched_history() {
            stats.record(&c).unwrap();
        }
        let metrics = stats.into_metrics(7, MetricOptions::default()).unwrap();

        assert_eq!(metrics.get_f64("CommitCount"), Some(3.0));
        assert_eq!(metrics.get_f64("BranchCount"), Some(2.0));
        assert_eq!(metrics.get_f64("FileCount"), Some(7.0));
        assert_eq!(metrics.get_f64("ContributorCount"), Some(2.0));
        assert_eq!(metrics.get_f64("AvgContributorCommits"), Some(1.5));
        assert_eq!(metrics.get_f64("AvgBranchCommits"), Some(1.5));
        assert_eq!(metrics.get_f64("Lifetime"), Some(30.0));
        assert!(metrics.get("GitSize").is_some());
        assert!(metrics.get("GitComplexity").is_some());
        assert_eq!(metrics.len(), 10);
    }

    #[test]
    fn test_commit_graph_points_to_parents() {
        let history = [
            commit(3, &[2], "alice", 2),
            commit(2, &[1], "alice", 1),
            commit(1, &[], "alice", 0),
        ];
        let mut stats = HistoryStats::new();
        for c in &history {
            stats.record(c).unwrap();
        }
        let metrics = stats.into_metrics(1, MetricOptions::default()).unwrap();

        let mut chain = GraphBuilder::new();
        chain.link(3, 2, 1.0).unwrap();
        chain.link(2, 1, 1.0).unwrap();
        let chain = chain.build();
        let opts = EstimatorOptions::default();

        assert_eq!(metrics.get_f64("GitSize"), Some(estimate_size(&chain, opts)));
        let complexity = estimate_complexity(&chain, opts);
        if complexity.is_finite() {
            assert_eq!(metrics.get_f64("GitComplexity"), Some(complexity));
        } else {
            assert!(metrics.get("GitComplexity").is_some_and(|v| v.is_null()));
        }
    }

    #[test]
    fn test_merge_only_history_is_an_error() {
        let mut stats = HistoryStats::new();
        stats.record(&commit(3, &[1, 2], "alice", 0)).unwrap();
        assert!(stats.into_metrics(0, MetricOptions::default()).is_err());
    }

    #[test]
    fn test_fail_policy_propagates() {
        // a single root commit: the lone node is isolated, every estimate is finite
        let mut stats = HistoryStats::new();
        stats.record(&commit(1, &[], "alice", 0)).unwrap();
        let opts = MetricOptions {
            non_finite: NonFinitePolicy::Fail,
            ..Default::default()
        };
        let metrics = stats.into_metrics(1, opts).unwrap();
        assert_eq!(metrics.get_f64("GitSize"), Some(0.0));
        assert_eq!(metrics.get_f64("Lifetime"), Some(0.0));
    }

    #[test]
    fn test_analyse_repository() -> Result<()> {
        let (dir, repo) = create_test_repo()?;
        commit_file(&repo, "src/a.c", "int a;", "Other")?;
        commit_file(&repo, "src/b.c", "int b;", "Test User")?;

        let history = GitHistory::open(dir.path())?;
        let metrics = analyse_history(&history, MetricOptions::default())?;

        assert_eq!(metrics.get_f64("CommitCount"), Some(3.0));
        assert_eq!(metrics.get_f64("ContributorCount"), Some(2.0));
        assert_eq!(metrics.get_f64("BranchCount"), Some(1.0));
        assert_eq!(metrics.get_f64("FileCount"), Some(3.0));
        Ok(())
    }
}
