//! GitCouplingTool: co-change coupling mined from version history

use super::CouplingTool;
use crate::analysis::CouplingSource;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct GitCouplingTool {
    command: String,
    file_types: Vec<String>,
    min_cochanges: u32,
}

impl GitCouplingTool {
    pub fn new(command: impl Into<String>, file_types: Vec<String>, min_cochanges: u32) -> Self {
        Self {
            command: command.into(),
            file_types,
            min_cochanges,
        }
    }
}

impl CouplingTool for GitCouplingTool {
    fn source(&self) -> CouplingSource {
        CouplingSource::Git
    }

    fn name(&self) -> &'static str {
        "gct"
    }

    fn result_file(&self, out_dir: &Path) -> PathBuf {
        out_dir.join("result.json")
    }

    fn command(&self, repo: &Path, out_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg(repo)
            .arg("-r")
            .arg("-c")
            .arg(self.min_cochanges.to_string());
        // the tool takes one file type per flag
        for file_type in &self.file_types {
            cmd.arg("--file-type").arg(file_type);
        }
        cmd.args(["-f", "JSON", "-o"]).arg(self.result_file(out_dir));
        cmd
    }
}
