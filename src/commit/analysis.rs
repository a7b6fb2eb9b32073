//! Staged-change analysis: prompt, chat, parse, and optional refinement.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chat::{ChatSession, ChatTransport, Cost};
use crate::commit::parse::{NO_CHANGES_MESSAGE, parse_reply};
use crate::commit::prompt::{build_analysis_prompt, seed_text};
use crate::commit::refine::refine_message;
use crate::config::Personas;
use crate::error::ChatError;

/// Outcome of analyzing a diff.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Files the responder proposed for the commit.
    pub files: Vec<String>,
    /// Final commit message (refined when seed text was given).
    pub message: String,
    /// Cost of the analysis exchange plus any refinement exchange.
    pub cost: Cost,
    /// The reply could not be parsed into files and a message.
    pub malformed: bool,
}

impl Analysis {
    /// The "nothing to commit" result.
    pub fn empty() -> Self {
        Self {
            files: Vec::new(),
            message: NO_CHANGES_MESSAGE.to_string(),
            cost: Cost::ZERO,
            malformed: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Analyze a diff and return the proposed files, message, and total cost.
///
/// At most two exchanges run, strictly one after the other: the analysis,
/// then (only with non-blank seed text) a refinement of its message. If the
/// analyst never answers, the empty result is returned and refinement is
/// skipped. There are no retries.
///
/// A reply without the `FILES:`/`MESSAGE:` layout, or with a blank message
/// section, is returned as malformed and never refined.
pub async fn analyze_changes(
    analyst: &ChatSession,
    refiner: &ChatSession,
    diff: &str,
    seed: Option<&str>,
) -> Result<Analysis, ChatError> {
    let seed = seed_text(seed);
    let prompt = build_analysis_prompt(diff, seed);

    debug!("Analysis prompt length: {} chars", prompt.len());

    let reply = match analyst.send(&prompt).await {
        Ok(reply) => reply,
        Err(e) if e.is_no_response() => {
            warn!("Analysis produced no message: {}", e);
            return Ok(Analysis::empty());
        }
        Err(e) => return Err(e),
    };

    let parsed = parse_reply(Some(&reply.content));
    let mut cost = reply.cost;

    if parsed.malformed || parsed.message.is_empty() {
        warn!("Reply has no usable FILES:/MESSAGE: layout");
        debug!("Raw reply: {}", reply.content);
        return Ok(Analysis {
            files: parsed.files,
            message: parsed.message,
            cost,
            malformed: true,
        });
    }

    info!("Detected {} files", parsed.files.len());
    debug!("Detected message: {}", parsed.message);

    let message = match seed {
        Some(seed) => {
            let (refined, refinement_cost) =
                refine_message(refiner, &parsed.message, Some(seed)).await?;
            cost += refinement_cost;
            refined
        }
        None => parsed.message,
    };

    Ok(Analysis {
        files: parsed.files,
        message,
        cost,
        malformed: false,
    })
}

/// Caller-owned pair of sessions: one for analysis, one for refinement.
///
/// Both sessions share a transport but answer under different personas.
#[derive(Clone)]
pub struct CommitAgent {
    analyst: ChatSession,
    refiner: ChatSession,
}

impl CommitAgent {
    pub fn new(transport: Arc<dyn ChatTransport>, model: &str, personas: &Personas) -> Self {
        Self {
            analyst: ChatSession::new(transport.clone(), model, personas.analyst.clone()),
            refiner: ChatSession::new(transport, model, personas.refiner.clone()),
        }
    }

    pub async fn analyze_changes(
        &self,
        diff: &str,
        seed: Option<&str>,
    ) -> Result<Analysis, ChatError> {
        analyze_changes(&self.analyst, &self.refiner, diff, seed).await
    }
}
