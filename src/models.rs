//! Output records for mining runs
//!
//! Every analysis produces a flat `MetricMap` (metric name -> number).
//! A repository's maps are grouped into a `RepoReport`, and the reports of
//! one run into a `MiningReport` keyed by repository directory name.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Flat mapping from metric name to value.
///
/// Non-finite floats have no JSON representation and are stored as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricMap(BTreeMap<String, Value>);

impl MetricMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_count(&mut self, name: &str, value: u64) {
        self.0.insert(name.to_string(), Value::from(value));
    }

    pub fn insert_float(&mut self, name: &str, value: f64) {
        let json = Number::from_f64(value).map_or(Value::Null, Value::Number);
        self.0.insert(name.to_string(), json);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    /// Names of metrics recorded as `null`.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, v)| v.is_null())
            .map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Results of every analysis run on one repository. A skipped analysis
/// serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoReport {
    pub git: Option<MetricMap>,
    pub sct: Option<MetricMap>,
    pub gct: Option<MetricMap>,
}

/// Results of one mining run, keyed by repository directory name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MiningReport(BTreeMap<String, RepoReport>);

impl MiningReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, repo: impl Into<String>, report: RepoReport) {
        self.0.insert(repo.into(), report);
    }

    pub fn get(&self, repo: &str) -> Option<&RepoReport> {
        self.0.get(repo)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Write the report as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)
            .with_context(|| format!("Failed to write results to {}", path.display()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read results from {}", path.display()))?;
        Ok(serde_json::from_str(&data)?)
    }
}
