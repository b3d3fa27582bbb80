//! Text-generation provider integrations for PostPilot.
//!
//! Currently a single OpenAI-compatible chat-completions client, which also
//! serves any provider speaking the same wire format.

mod openai;

pub use openai::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, OpenAiClient,
};
