//! Git operations using git2-rs.

pub mod diff;
pub mod ops;

pub use diff::{FileStatus, StagedChanges, StagedFile, collect_staged};
pub use ops::{
    PushTarget, create_commit, current_branch, open_repository, push_current_branch, stage_files,
};
