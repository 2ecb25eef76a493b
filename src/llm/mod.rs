//! Chat completion providers

mod openrouter;

use async_trait::async_trait;

use crate::Result;
use crate::conversation::Message;

pub use openrouter::OpenRouterClient;

/// Produces one assistant reply for an ordered list of role-tagged messages
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Request a completion
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ChatStatus`] when the service answers with a
    /// non-success status, and another error on transport or decoding failure
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}
