//! Configuration file support
//!
//! Loads `cgm.toml` from, in order: an explicit `--config` path, the
//! current directory, or the user config directory
//! (`~/.config/cgm/config.toml` on Linux).
//!
//! # Configuration Format
//!
//! ```toml
//! # cgm.toml
//!
//! [tools]
//! sct = "/opt/sct/StaticCouplingTool"
//! gct = "GitCouplingTool"
//! sct_language = "cpp"
//! gct_file_types = [".c", ".cpp", ".h", ".hpp"]
//! gct_min_cochanges = 1
//!
//! [engine]
//! charge_pipes_once = false
//! empty_remainder_is_zero = false
//! fail_on_non_finite = false
//!
//! [defaults]
//! output = "result.json"
//! work_dir = ".mp"
//! workers = 4
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "cgm.toml";

/// Contents of a `cgm.toml` file. Every field is optional.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct CgmConfig {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub defaults: CliDefaults,
}

/// External tool commands and their arguments
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ToolsConfig {
    /// Command running the StaticCouplingTool
    #[serde(default)]
    pub sct: Option<String>,

    /// Command running the GitCouplingTool
    #[serde(default)]
    pub gct: Option<String>,

    /// Language passed to the StaticCouplingTool (`-l`)
    #[serde(default)]
    pub sct_language: Option<String>,

    /// File types passed to the GitCouplingTool (`--file-type`)
    #[serde(default)]
    pub gct_file_types: Option<Vec<String>>,

    /// Minimum co-change count passed to the GitCouplingTool (`-c`)
    #[serde(default)]
    pub gct_min_cochanges: Option<u32>,
}

/// Estimator switches
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub charge_pipes_once: Option<bool>,

    #[serde(default)]
    pub empty_remainder_is_zero: Option<bool>,

    /// Fail an analysis when a metric is NaN or infinite
    #[serde(default)]
    pub fail_on_non_finite: Option<bool>,
}

/// Defaults for command-line flags
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct CliDefaults {
    /// Default output file
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Default work directory
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    /// Default number of workers
    #[serde(default)]
    pub workers: Option<usize>,
}

/// User-level config file path
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cgm").join("config.toml"))
}

/// Load configuration.
///
/// An explicit path must exist and parse. Implicit locations are skipped
/// with a warning when they fail to parse.
pub fn load_config(explicit: Option<&Path>) -> Result<CgmConfig> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    load_config_from(explicit, &cwd, user_config_path())
}

pub(crate) fn load_config_from(
    explicit: Option<&Path>,
    cwd: &Path,
    user_path: Option<PathBuf>,
) -> Result<CgmConfig> {
    if let Some(path) = explicit {
        let config = load_toml_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        return Ok(config);
    }

    let candidates = std::iter::once(cwd.join(CONFIG_FILE_NAME)).chain(user_path);
    for path in candidates {
        if !path.exists() {
            continue;
        }
        match load_toml_config(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                return Ok(config);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    Ok(CgmConfig::default())
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> Result<CgmConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: CgmConfig = toml::from_str(&content)?;
    Ok(config)
}
