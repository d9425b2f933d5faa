//! Input file parsing
//!
//! The input file lists repositories as pairs of lines: the clone URL,
//! then the shell command that builds the repository.
//!
//! ```text
//! https://github.com/example/project.git
//! mkdir -p build && cd build && cmake .. && make
//! ```

use anyhow::{bail, Context, Result};
use std::path::Path;

/// A repository to mine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub url: String,
    pub build_command: String,
}

/// Parse the input file at `path`.
pub fn parse_input(path: &Path) -> Result<Vec<RepoSpec>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    parse_input_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Parse input file content.
pub fn parse_input_str(content: &str) -> Result<Vec<RepoSpec>> {
    let mut specs = Vec::new();
    let mut lines = content.lines();

    while let Some(url) = lines.next() {
        let Some(build_command) = lines.next() else {
            bail!("missing command line for {}", url);
        };
        specs.push(RepoSpec {
            url: url.to_string(),
            build_command: build_command.to_string(),
        });
    }

    Ok(specs)
}
