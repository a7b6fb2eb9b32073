//! stagecraft - an LLM-assisted commit tool.
//!
//! # Overview
//!
//! stagecraft reads the staged diff of a git repository, asks an LLM chat
//! responder which files belong in the commit and what the conventional
//! commit message should be, optionally refines that message with seed text
//! from the user, and then stages, commits, and pushes.

pub mod chat;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;

// Re-export commonly used types
pub use chat::{ChatSession, ChatTransport, Cost, OpenAiTransport, Responder};
pub use commit::{Analysis, CommitAgent, ParsedResult, analyze_changes, parse_reply};
pub use config::{Config, Personas};
pub use error::{ChatError, GitError};
pub use git::{StagedChanges, collect_staged};
