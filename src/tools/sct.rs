//! StaticCouplingTool: include/dependency coupling from source code

use super::CouplingTool;
use crate::analysis::CouplingSource;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct StaticCouplingTool {
    command: String,
    language: String,
}

impl StaticCouplingTool {
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }
}

impl CouplingTool for StaticCouplingTool {
    fn source(&self) -> CouplingSource {
        CouplingSource::Static
    }

    fn name(&self) -> &'static str {
        "sct"
    }

    // the tool writes one numbered directory per analysed module
    fn result_file(&self, out_dir: &Path) -> PathBuf {
        out_dir.join("0").join("results.json")
    }

    fn command(&self, repo: &Path, out_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg("-m")
            .arg("-l")
            .arg(&self.language)
            .arg("-p")
            .arg(repo)
            .arg("-o")
            .arg(out_dir);
        cmd
    }
}
