//! Foreman - bilingual voice assistant for a construction site
//!
//! This library provides the pieces of a turn-by-turn conversational agent:
//! - Conversation state: bounded context windows, durable history, command
//!   classification and site-status injection
//! - Chat completion through an OpenAI-compatible API (`OpenRouter` by default)
//! - Voice input (microphone capture, transcription with language fallback)
//!   and spoken replies
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   Session loop                      │
//! │   Prompter  │  VoiceInput  │  Speaker  │  Render    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Dialogue manager                     │
//! │   History  │  Commands  │  Site snapshot  │  Store  │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │               External providers                    │
//! │   Chat completion  │  Whisper STT  │  TTS           │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod session;
pub mod setup;
pub mod voice;

pub use config::Config;
pub use conversation::{
    DialogueManager, DialogueOptions, History, HistoryStore, Input, JsonHistoryStore, Message,
    Reply, Role, SiteSnapshot,
};
pub use error::{Error, Result};
pub use llm::{ChatProvider, OpenRouterClient};
pub use session::{Prompter, Session, SessionState, TerminalPrompter};
