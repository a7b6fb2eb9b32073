//! Staged diff collection using git2.

use std::fmt;

use git2::{Delta, Diff, DiffFormat, ErrorCode, Repository, Tree};
use tracing::warn;

use crate::error::GitError;

/// Status of a staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Added => write!(f, "Added"),
            FileStatus::Modified => write!(f, "Modified"),
            FileStatus::Deleted => write!(f, "Deleted"),
            FileStatus::Renamed => write!(f, "Renamed"),
        }
    }
}

/// A file with staged changes.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub path: String,
    pub status: FileStatus,
}

/// Everything staged for the next commit.
#[derive(Debug, Clone, Default)]
pub struct StagedChanges {
    /// Unified diff text, equivalent to `git diff --cached`.
    pub diff_text: String,
    pub files: Vec<StagedFile>,
    pub additions: usize,
    pub deletions: usize,
}

impl StagedChanges {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Staged file paths, in diff order.
    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// `Ok(Some(tree))` for repos with a valid HEAD, or `Err(GitError::DiffFailed)`
/// for real errors (corrupt HEAD, missing objects).
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// Collect the staged diff (HEAD tree against the index).
///
/// Unstaged and untracked files are ignored. A repository with nothing
/// staged yields an empty [`StagedChanges`]; deciding what to do with that
/// is up to the caller.
pub fn collect_staged(repo: &Repository) -> Result<StagedChanges, GitError> {
    let head_tree = resolve_head_tree(repo)?;

    let staged = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;

    let files = collect_files_from_diff(&staged);
    if files.is_empty() {
        return Ok(StagedChanges::default());
    }

    let mut changes = StagedChanges {
        files,
        ..Default::default()
    };
    append_diff_text(&staged, &mut changes);

    Ok(changes)
}

/// Collect staged file entries from a diff.
fn collect_files_from_diff(diff: &Diff<'_>) -> Vec<StagedFile> {
    diff.deltas()
        .filter_map(|delta| {
            let status = match delta.status() {
                Delta::Added => FileStatus::Added,
                Delta::Deleted => FileStatus::Deleted,
                Delta::Renamed => FileStatus::Renamed,
                _ => FileStatus::Modified,
            };

            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string())?;

            Some(StagedFile { path, status })
        })
        .collect()
}

/// Append the unified patch text of a diff, counting added and removed lines.
fn append_diff_text(diff: &Diff<'_>, changes: &mut StagedChanges) {
    if let Err(e) = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        match origin {
            '+' => changes.additions += 1,
            '-' => changes.deletions += 1,
            _ => {}
        }

        if matches!(origin, '+' | '-' | ' ') {
            changes.diff_text.push(origin);
        }
        changes
            .diff_text
            .push_str(&String::from_utf8_lossy(line.content()));

        true
    }) {
        warn!("Failed to render staged diff text: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use git2::Signature;

    fn init_repo_with_commit(dir: &Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        std::fs::write(dir.join("file.txt"), "original\n").unwrap();
        {
            let mut index = repo.index().unwrap();
            index.add_path(Path::new("file.txt")).unwrap();
            index.write().unwrap();
            let tree_id = index.write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            let sig = Signature::now("Test", "test@test.com").unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])
                .unwrap();
        }
        repo
    }

    fn stage(repo: &Repository, path: &str) {
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(path)).unwrap();
        index.write().unwrap();
    }

    #[test]
    fn test_file_status_display() {
        assert_eq!(FileStatus::Added.to_string(), "Added");
        assert_eq!(FileStatus::Modified.to_string(), "Modified");
        assert_eq!(FileStatus::Deleted.to_string(), "Deleted");
        assert_eq!(FileStatus::Renamed.to_string(), "Renamed");
    }

    #[test]
    fn test_collect_staged_clean_repo_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());

        let changes = collect_staged(&repo).unwrap();
        assert!(changes.is_empty());
        assert!(changes.diff_text.is_empty());
    }

    #[test]
    fn test_collect_staged_ignores_unstaged_and_untracked() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());

        std::fs::write(dir.path().join("file.txt"), "edited but not staged\n").unwrap();
        std::fs::write(dir.path().join("untracked.txt"), "new\n").unwrap();

        let changes = collect_staged(&repo).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_collect_staged_modification() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());

        std::fs::write(dir.path().join("file.txt"), "modified\n").unwrap();
        stage(&repo, "file.txt");

        let changes = collect_staged(&repo).unwrap();
        assert_eq!(changes.paths(), vec!["file.txt"]);
        assert_eq!(changes.files[0].status, FileStatus::Modified);
        assert!(changes.diff_text.contains("-original"));
        assert!(changes.diff_text.contains("+modified"));
        assert_eq!(changes.additions, 1);
        assert_eq!(changes.deletions, 1);
    }

    #[test]
    fn test_collect_staged_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());

        std::fs::write(dir.path().join("new.txt"), "hello\n").unwrap();
        stage(&repo, "new.txt");

        let changes = collect_staged(&repo).unwrap();
        assert!(
            changes
                .files
                .iter()
                .any(|f| f.path == "new.txt" && f.status == FileStatus::Added)
        );
        assert!(changes.diff_text.contains("+hello"));
    }

    #[test]
    fn test_collect_staged_empty_repo_uses_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        std::fs::write(dir.path().join("first.txt"), "first\n").unwrap();
        stage(&repo, "first.txt");

        let changes = collect_staged(&repo).unwrap();
        assert_eq!(changes.paths(), vec!["first.txt"]);
    }

    #[test]
    fn test_collect_staged_corrupt_head_propagates_error() {
        let dir = tempfile::tempdir().unwrap();
        init_repo_with_commit(dir.path());

        std::fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/\0invalid").unwrap();

        let repo = Repository::open(dir.path()).unwrap();
        let result = collect_staged(&repo);
        assert!(
            matches!(result, Err(GitError::DiffFailed(_))),
            "Expected DiffFailed for corrupt HEAD, got: {:?}",
            result
        );
    }
}
