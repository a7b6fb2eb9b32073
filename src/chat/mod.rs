//! Chat exchanges with an LLM responder.

pub mod cost;
pub mod openai;
pub mod session;

pub use cost::{Cost, Usage};
pub use openai::OpenAiTransport;
pub use session::{ChatCompletion, ChatReply, ChatRequest, ChatSession, ChatTransport, Responder};
