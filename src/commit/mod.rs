//! AI-proposed commits: prompt, reply parsing, refinement, and orchestration.

pub mod analysis;
pub mod parse;
pub mod prompt;
pub mod refine;

pub use analysis::{Analysis, CommitAgent, analyze_changes};
pub use parse::{NO_CHANGES_MESSAGE, ParsedResult, parse_reply, strip_sentinel_lines};
pub use prompt::{
    FILES_MARKER, MESSAGE_MARKER, TERMINATION_SENTINEL, build_analysis_prompt,
    build_refinement_prompt,
};
pub use refine::refine_message;
