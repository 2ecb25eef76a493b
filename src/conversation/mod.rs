//! Conversation state and turn handling
//!
//! - `message`: role-tagged messages and the append-only history
//! - `store`: durable JSON persistence of the history
//! - `command`: classification of raw input into commands or messages
//! - `situation`: the per-run construction site snapshot and keyword injection
//! - `manager`: context-window construction and turn commit

mod command;
mod manager;
mod message;
mod situation;
mod store;

pub use command::{Input, TERMINATION_PHRASES, is_confirmed};
pub use manager::{
    CONNECTION_FALLBACK, DialogueManager, DialogueOptions, ERROR_FALLBACK, Reply, SYSTEM_PROMPT,
};
pub use message::{History, Message, Role};
pub use situation::{SITE_KEYWORDS, SiteSnapshot, augment, mentions_site};
pub use store::{HistoryStore, JsonHistoryStore};
