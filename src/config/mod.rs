//! Configuration module for cgm
//!
//! This module handles:
//! - The `cgm.toml` configuration file
//! - Tool commands and their arguments
//! - Estimator switches
//! - CLI defaults

mod options;
mod project_config;

pub use options::{
    MiningOptions, ToolOptions, DEFAULT_GCT_COMMAND, DEFAULT_GCT_FILE_TYPES, DEFAULT_OUTPUT,
    DEFAULT_SCT_COMMAND, DEFAULT_SCT_LANGUAGE,
};
pub use project_config::{
    load_config, user_config_path, CgmConfig, CliDefaults, EngineConfig, ToolsConfig,
    CONFIG_FILE_NAME,
};
