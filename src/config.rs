//! Runtime configuration read from the process environment.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::chat::Responder;

/// Environment variable holding the chat API key.
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Environment variable overriding the chat API base URL.
pub const BASE_URL_ENV_VAR: &str = "OPENAI_BASE_URL";

/// Environment variable overriding the model identifier.
pub const MODEL_ENV_VAR: &str = "STAGECRAFT_MODEL";

/// Environment variable overriding the per-exchange timeout (seconds).
pub const TIMEOUT_ENV_VAR: &str = "STAGECRAFT_TIMEOUT";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

const ANALYST_SYSTEM_MESSAGE: &str = "You are a helpful assistant that analyzes git diffs and suggests:
1. Which files should be included in the commit
2. An appropriate commit message following conventional commit format

Focus on creating clear, concise commit messages that explain the purpose of the changes.";

const REFINER_SYSTEM_MESSAGE: &str = "You are a commit message refiner that takes:
1. An initial commit message
2. Optional seed text from the user

Your job is to enhance the commit message while maintaining conventional commit format.
Incorporate relevant context from the seed text while keeping the message clear and concise.
Make sure the commit message is always in plain text.";

/// The two responder personas used by the commit agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Personas {
    /// Proposes files and a commit message from a diff.
    pub analyst: Responder,
    /// Improves an existing commit message with seed context.
    pub refiner: Responder,
}

impl Default for Personas {
    fn default() -> Self {
        Self {
            analyst: Responder::new("git_assistant", ANALYST_SYSTEM_MESSAGE),
            refiner: Responder::new("commit_refiner", REFINER_SYSTEM_MESSAGE),
        }
    }
}

/// Resolved configuration for one stagecraft run.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub personas: Personas,
}

impl Config {
    /// Build the configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var(API_KEY_ENV_VAR),
            base_url: non_empty_var(BASE_URL_ENV_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: non_empty_var(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: get_timeout(),
            personas: Personas::default(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get the configured per-exchange timeout.
///
/// Reads from STAGECRAFT_TIMEOUT if set, otherwise uses the default of
/// 120 seconds. Logs a warning if the variable holds an invalid value.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}
