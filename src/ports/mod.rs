//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the command runner and an
//! external system (the completion service, the filesystem).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod llm;

pub use filesystem::FileSystem;
pub use llm::{ChatMessage, CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
