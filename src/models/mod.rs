//! Data models for the Chat Completions API.
//!
//! - `chat`: request types (roles, messages, request body) and a typed view of
//!   the OpenAI-shaped response.
//! - `completion`: the raw response payload as returned by the endpoint.

pub mod chat;
pub mod completion;

pub use chat::{
    ChatChoice, ChatCompletionResponse, ChatMessage, ChatResponseMessage, ChatUsage,
    CompletionRequest, Role,
};
pub use completion::CompletionResponse;
