//! Resolved options for a mining run (config file defaults, then CLI overrides)

use super::CgmConfig;
use crate::analysis::{MetricOptions, NonFinitePolicy};
use crate::cache::DEFAULT_WORK_DIR;
use crate::graph::EstimatorOptions;
use std::path::PathBuf;

pub const DEFAULT_SCT_COMMAND: &str = "StaticCouplingTool";
pub const DEFAULT_GCT_COMMAND: &str = "GitCouplingTool";
pub const DEFAULT_SCT_LANGUAGE: &str = "cpp";
pub const DEFAULT_GCT_FILE_TYPES: &[&str] = &[".c", ".cpp", ".h", ".hpp"];
pub const DEFAULT_OUTPUT: &str = "./result.json";

/// How to invoke the external coupling tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOptions {
    pub sct: String,
    pub gct: String,
    pub sct_language: String,
    pub gct_file_types: Vec<String>,
    pub gct_min_cochanges: u32,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            sct: DEFAULT_SCT_COMMAND.to_string(),
            gct: DEFAULT_GCT_COMMAND.to_string(),
            sct_language: DEFAULT_SCT_LANGUAGE.to_string(),
            gct_file_types: DEFAULT_GCT_FILE_TYPES.iter().map(|s| s.to_string()).collect(),
            gct_min_cochanges: 1,
        }
    }
}

/// Everything a mining run needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct MiningOptions {
    /// 0: errors, 1: status, 2: debug, 3: also pass child process output through
    pub verbosity: u8,
    pub tools: ToolOptions,
    pub skip_build: bool,
    pub skip_git: bool,
    pub skip_sct: bool,
    pub skip_gct: bool,
    /// Reclone repositories ignoring existing clones
    pub force_git: bool,
    /// Rerun the StaticCouplingTool ignoring old outputs
    pub force_sct: bool,
    /// Rerun the GitCouplingTool ignoring old outputs
    pub force_gct: bool,
    pub work_dir: PathBuf,
    pub workers: usize,
    pub metrics: MetricOptions,
}

impl Default for MiningOptions {
    fn default() -> Self {
        Self {
            verbosity: 1,
            tools: ToolOptions::default(),
            skip_build: false,
            skip_git: false,
            skip_sct: false,
            skip_gct: false,
            force_git: false,
            force_sct: false,
            force_gct: false,
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            workers: 1,
            metrics: MetricOptions::default(),
        }
    }
}

impl MiningOptions {
    /// Defaults overlaid with a config file.
    pub fn from_config(config: &CgmConfig) -> Self {
        let mut opts = Self::default();

        let tools = &config.tools;
        if let Some(sct) = &tools.sct {
            opts.tools.sct = sct.clone();
        }
        if let Some(gct) = &tools.gct {
            opts.tools.gct = gct.clone();
        }
        if let Some(language) = &tools.sct_language {
            opts.tools.sct_language = language.clone();
        }
        if let Some(types) = &tools.gct_file_types {
            opts.tools.gct_file_types = types.clone();
        }
        if let Some(min) = tools.gct_min_cochanges {
            opts.tools.gct_min_cochanges = min;
        }

        let engine = &config.engine;
        opts.metrics = MetricOptions {
            estimator: EstimatorOptions {
                charge_pipes_once: engine.charge_pipes_once.unwrap_or(false),
                empty_remainder_is_zero: engine.empty_remainder_is_zero.unwrap_or(false),
            },
            non_finite: if engine.fail_on_non_finite.unwrap_or(false) {
                NonFinitePolicy::Fail
            } else {
                NonFinitePolicy::Record
            },
        };

        if let Some(work_dir) = &config.defaults.work_dir {
            opts.work_dir = work_dir.clone();
        }
        if let Some(workers) = config.defaults.workers {
            opts.workers = workers.max(1);
        }

        opts
    }

    /// Whether child processes inherit stdio.
    pub fn passthrough(&self) -> bool {
        self.verbosity >= 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tool_conventions() {
        let opts = MiningOptions::default();
        assert_eq!(opts.tools.sct, "StaticCouplingTool");
        assert_eq!(opts.tools.gct, "GitCouplingTool");
        assert_eq!(opts.tools.gct_file_types, vec![".c", ".cpp", ".h", ".hpp"]);
        assert_eq!(opts.work_dir, PathBuf::from(".mp"));
        assert_eq!(opts.metrics, MetricOptions::default());
        assert!(!opts.passthrough());
    }

    #[test]
    fn test_config_overlays_defaults() {
        let config: CgmConfig = toml::from_str(
            "[tools]\ngct = \"gct.jar\"\n[engine]\nfail_on_non_finite = true\nempty_remainder_is_zero = true\n[defaults]\nworkers = 0\n",
        )
        .unwrap();
        let opts = MiningOptions::from_config(&config);

        assert_eq!(opts.tools.gct, "gct.jar");
        assert_eq!(opts.tools.sct, DEFAULT_SCT_COMMAND);
        assert_eq!(opts.metrics.non_finite, NonFinitePolicy::Fail);
        assert!(opts.metrics.estimator.empty_remainder_is_zero);
        assert!(!opts.metrics.estimator.charge_pipes_once);
        assert_eq!(opts.workers, 1);
    }
}
