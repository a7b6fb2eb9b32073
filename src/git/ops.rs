//! Staging, committing, and pushing.
//!
//! Staging and committing go through git2. Pushing shells out to the system
//! `git` binary so the user's credential helpers and SSH agent apply.

use std::path::Path;
use std::process::Command;

use git2::{ErrorCode, Oid, Repository};
use tracing::{debug, info};

use crate::error::GitError;

/// Where a push went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    pub remote: String,
    pub url: Option<String>,
    pub branch: String,
}

/// Open the repository containing `path`, searching parent directories.
pub fn open_repository(path: impl AsRef<Path>) -> Result<Repository, GitError> {
    Repository::discover(path).map_err(GitError::OpenRepository)
}

/// Stage the given paths (relative to the working directory).
///
/// Paths that no longer exist in the working tree are staged as deletions.
pub fn stage_files(repo: &Repository, paths: &[String]) -> Result<(), GitError> {
    let workdir = repo.workdir().ok_or(GitError::BareRepository)?;
    let mut index = repo.index().map_err(GitError::IndexFailed)?;

    for path in paths {
        let relative = Path::new(path);
        let result = if workdir.join(relative).exists() {
            index.add_path(relative)
        } else {
            index.remove_path(relative)
        };

        result.map_err(|source| GitError::StagingFailed {
            path: path.clone(),
            source,
        })?;
    }

    index.write().map_err(GitError::IndexFailed)?;
    debug!("Staged {} paths", paths.len());
    Ok(())
}

/// Create a commit on HEAD from the current index.
///
/// The signature comes from git config. An unborn HEAD produces a root commit.
pub fn create_commit(repo: &Repository, message: &str) -> Result<Oid, GitError> {
    let mut index = repo.index().map_err(GitError::IndexFailed)?;
    let tree_id = index.write_tree().map_err(GitError::IndexFailed)?;
    let tree = repo.find_tree(tree_id).map_err(GitError::CommitFailed)?;

    let sig = repo.signature().map_err(GitError::ConfigError)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit().map_err(GitError::CommitFailed)?),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => None,
        Err(e) => return Err(GitError::CommitFailed(e)),
    };
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    let oid = repo
        .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .map_err(GitError::CommitFailed)?;

    info!("Created commit {}", oid);
    Ok(oid)
}

/// Get the current branch name.
pub fn current_branch(repo: &Repository) -> Result<String, GitError> {
    let head = repo.head().map_err(GitError::HeadUnavailable)?;

    if !head.is_branch() {
        return Err(GitError::DetachedHead);
    }

    head.shorthand()
        .map(String::from)
        .ok_or(GitError::DetachedHead)
}

/// Resolve the remote for a branch: its configured upstream remote, else `origin`.
fn branch_remote(repo: &Repository, branch: &str) -> String {
    repo.config()
        .and_then(|config| config.get_string(&format!("branch.{branch}.remote")))
        .ok()
        .filter(|remote| !remote.trim().is_empty())
        .unwrap_or_else(|| "origin".to_string())
}

/// Push the current branch to the same-named branch on its remote.
pub fn push_current_branch(repo: &Repository) -> Result<PushTarget, GitError> {
    if which::which("git").is_err() {
        return Err(GitError::GitNotInstalled);
    }

    let workdir = repo.workdir().ok_or(GitError::BareRepository)?;
    let branch = current_branch(repo)?;
    let remote = branch_remote(repo, &branch);
    let url = repo
        .find_remote(&remote)
        .ok()
        .and_then(|r| r.url().map(String::from));

    let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
    run_git(workdir, &["push", &remote, &refspec], "push")?;

    Ok(PushTarget { remote, url, branch })
}

/// Run a git command in `workdir` and return success or a descriptive error.
fn run_git(workdir: &Path, args: &[&str], operation: &str) -> Result<(), GitError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(workdir)
        .args(args)
        .output()
        .map_err(|e| GitError::CommandFailed {
            operation: operation.to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::CommandFailed {
            operation: operation.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(())
}
