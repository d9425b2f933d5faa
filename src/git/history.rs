//! Git history extraction using libgit2
//!
//! Walks every commit reachable from HEAD or any reference and exposes
//! the data the commit analysis needs: ancestry, author and timestamp.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use git2::{Oid, Repository, Sort};
use std::path::Path;
use tracing::debug;

/// One commit of the history, reduced to what the metrics need.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    pub id: Oid,
    /// Parent commits, in git order.
    pub parents: Vec<Oid>,
    /// Author name
    pub author: String,
    /// Author timestamp
    pub time: DateTime<Utc>,
}

impl CommitRecord {
    /// Merge commits have more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Git history reader using libgit2.
pub struct GitHistory {
    repo: Repository,
}

impl GitHistory {
    /// Open the repository rooted at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path)
            .with_context(|| format!("Failed to open git repository at {:?}", path))?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo })
    }

    /// Check if `path` is the root of a git repository.
    pub fn is_git_repo(path: &Path) -> bool {
        Repository::open(path).is_ok()
    }

    /// Every commit reachable from HEAD or any reference.
    pub fn commit_records(&self) -> Result<Vec<CommitRecord>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_head().context("Repository has no HEAD commit")?;
        // non-commit references are skipped by libgit2
        revwalk.push_glob("refs/*")?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            let author = commit.author();

            commits.push(CommitRecord {
                id: oid,
                parents: commit.parent_ids().collect(),
                author: author.name().unwrap_or("Unknown").to_string(),
                time: Utc
                    .timestamp_opt(author.when().seconds(), 0)
                    .single()
                    .unwrap_or_default(),
            });
        }

        debug!("Collected {} commits", commits.len());
        Ok(commits)
    }

    /// Get the list of all tracked files in the HEAD tree.
    pub fn tracked_files(&self) -> Result<Vec<String>> {
        let head = self.repo.head()?;
        let tree = head.peel_to_tree()?;

        let mut files = Vec::new();
        tree.walk(git2::TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() == Some(git2::ObjectType::Blob) {
                let path = if dir.is_empty() {
                    entry.name().unwrap_or("").to_string()
                } else {
                    format!("{}{}", dir, entry.name().unwrap_or(""))
                };
                files.push(path);
            }
            git2::TreeWalkResult::Ok
        })?;

        Ok(files)
    }
}
