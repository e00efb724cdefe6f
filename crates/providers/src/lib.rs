//! Completion clients for the Docent runtime.
//!
//! The only concrete client speaks the OpenAI chat-completions wire format,
//! which the AIML API (and most hosted inference endpoints) follow.

pub mod openai_compat;
pub mod traits;
pub(crate) mod util;

pub use openai_compat::OpenAiCompatClient;
pub use traits::{ChatRequest, ChatResponse, CompletionClient};
