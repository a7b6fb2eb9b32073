//! Best-effort refinement of a commit message with user-supplied context.

use tracing::{debug, warn};

use crate::chat::{ChatSession, Cost};
use crate::commit::parse::strip_sentinel_lines;
use crate::commit::prompt::build_refinement_prompt;
use crate::error::ChatError;

/// Ask the refiner to improve `initial_message`, optionally guided by seed text.
///
/// A responder that never answers is not fatal: the initial message comes
/// back unchanged with zero cost. A blank refinement also keeps the initial
/// message, but its cost is still counted. Transport and credential errors
/// propagate.
pub async fn refine_message(
    session: &ChatSession,
    initial_message: &str,
    seed: Option<&str>,
) -> Result<(String, Cost), ChatError> {
    let prompt = build_refinement_prompt(initial_message, seed);

    let reply = match session.send(&prompt).await {
        Ok(reply) => reply,
        Err(e) if e.is_no_response() => {
            warn!("Refinement produced no message ({}), keeping the original", e);
            return Ok((initial_message.to_string(), Cost::ZERO));
        }
        Err(e) => return Err(e),
    };

    let refined = strip_sentinel_lines(&reply.content);
    if refined.is_empty() {
        warn!("Refinement reply was empty after removing the sentinel, keeping the original");
        return Ok((initial_message.to_string(), reply.cost));
    }

    debug!("Refined message: {}", refined);
    Ok((refined, reply.cost))
}
