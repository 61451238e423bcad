//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM abstraction, a function-calling
//! tool system and per-session chat history.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ChatHandler                          │
//! │  ┌──────────────┐  ┌─────────────────────────────────────┐  │
//! │  │ SessionStore │  │               Agent                 │  │
//! │  │  (history)   │──│  Reasoning ─ ToolRegistry ─ Provider │  │
//! │  └──────────────┘  └─────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait keeps the agent independent of the remote model;
//! the `SessionStore` trait keeps history out of global state.

pub mod chat;
pub mod error;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod session;
pub mod tool;

#[cfg(test)]
mod testing;

pub use chat::ChatHandler;
pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use session::{MemorySessionStore, RetentionPolicy, Session, SessionId, SessionStore};
pub use tool::{ParameterSchema, Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
