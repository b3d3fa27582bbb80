//! OpenAI-compatible chat completions.

mod client;
mod dto;

pub use client::OpenAiClient;
pub use dto::{ChatChoice, ChatMessage, ChatRequest, ChatResponse};
