//! Repository access through libgit2
//!
//! - `history`: commit walk over every reference of a repository
//! - `clone`: cloning and building the repositories listed in the input file
//!
//! # Example
//!
//! ```no_run
//! use cgm::analysis::{analyse_history, MetricOptions};
//! use cgm::git::GitHistory;
//! use std::path::Path;
//!
//! let history = GitHistory::open(Path::new("/path/to/repo")).unwrap();
//! let metrics = analyse_history(&history, MetricOptions::default()).unwrap();
//! println!("{} commits", metrics.get_f64("CommitCount").unwrap_or(0.0));
//! ```

pub mod clone;
pub mod history;

pub use clone::{build_repo, clone_repo, load_repo, load_repos};
pub use history::{CommitRecord, GitHistory};
