//! cgm - coupling graph metrics for software repositories
//!
//! Mines repositories and estimates information-theoretic size and
//! complexity scores from three coupling graphs: commit ancestry, static
//! source coupling and git co-change coupling.
//!
//! - [`graph`]: the graph metric engine shared by every analysis
//! - [`analysis`]: metric records built on top of the engine
//! - [`tools`]: the external StaticCouplingTool / GitCouplingTool seam
//! - [`git`]: libgit2 history walk, cloning and building

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod git;
pub mod graph;
pub mod input;
pub mod models;
pub mod tools;
