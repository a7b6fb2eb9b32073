//! Prompt construction for commit analysis and message refinement.

/// Marker opening the file list in a reply.
pub const FILES_MARKER: &str = "FILES:";

/// Marker opening the commit message in a reply.
pub const MESSAGE_MARKER: &str = "MESSAGE:";

/// Token the responder emits to end its turn.
pub const TERMINATION_SENTINEL: &str = "TERMINATE";

/// Normalize optional seed text: blank input counts as absent.
pub fn seed_text(seed: Option<&str>) -> Option<&str> {
    seed.map(str::trim).filter(|s| !s.is_empty())
}

/// Build the prompt asking the responder to pick files and write a commit message.
///
/// The diff is embedded verbatim. The seed clause only appears when seed text
/// is non-empty. The reply layout is fixed and ends with the sentinel.
pub fn build_analysis_prompt(diff: &str, seed: Option<&str>) -> String {
    let seed_clause = match seed_text(seed) {
        Some(seed) => format!("\nConsider this seed text for the commit message: {seed}\n"),
        None => String::new(),
    };

    format!(
        r#"Please analyze this git diff and suggest:
1. Which files should be included in the commit
2. A clear commit message following conventional commit format
3. For larger commits, include details about the changes made as bullet points

Git diff:
{diff}
{seed_clause}
Format your response as:
{FILES_MARKER}
- file1
- file2

{MESSAGE_MARKER}
type(scope): description

Additional details as bullet points (if needed)

{TERMINATION_SENTINEL}"#
    )
}

/// Build the prompt asking the refiner to improve an existing commit message.
pub fn build_refinement_prompt(initial_message: &str, seed: Option<&str>) -> String {
    let context_clause = match seed_text(seed) {
        Some(seed) => format!("\nConsider this additional context: {seed}\n"),
        None => String::new(),
    };

    format!(
        r#"Please refine this commit message:

{initial_message}
{context_clause}
Keep the conventional commit format and ensure the message is clear and concise.
Reply with the refined commit message only, in plain text.

{TERMINATION_SENTINEL}"#
    )
}
