//! SeaSage, the sagar research assistant.
//!
//! This crate provides:
//! - Chat request and reply types
//! - The [`AssistantProvider`] trait with HTTP providers for the sagar
//!   analysis backend and an OpenAI-compatible AI gateway
//! - [`Assistant`], which tries each provider in turn and falls back to an
//!   offline reply when none answers
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  Assistant                   │
//! │   greeting? ──▶ reply as "System"            │
//! │        │                                     │
//! │        ▼                                     │
//! │  ┌──────────────┐   ┌──────────────┐         │
//! │  │ SageBackend  │──▶│   Gateway    │──▶ offline
//! │  │   Provider   │err│   Provider   │err      │
//! │  └──────────────┘   └──────────────┘         │
//! └──────────────────────────────────────────────┘
//! ```

mod error;
mod types;

pub mod assistant;
pub mod auth;
pub mod config;
pub mod providers;

pub use assistant::Assistant;
pub use config::AssistantConfig;
pub use error::{Error, Result};
pub use providers::AssistantProvider;
pub use types::{AssistantReply, ChatRequest, Message, Role};
