//! Dialogue manager: owns the history and decides what each request carries

use super::situation::{self, SiteSnapshot};
use super::store::HistoryStore;
use super::{History, Message};
use crate::Error;
use crate::llm::ChatProvider;

/// Fixed persona and behavior instruction sent as the system message
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant for Riverwood Residential Complex construction site. \
You can speak both Hindi and English fluently. \
You help with construction updates, answer questions, and have casual conversations. \
Keep responses conversational, brief (2-3 sentences), and friendly. \
If user asks about construction updates, provide specific details from the data provided. \
Remember previous conversation context.";

/// Reply used when the chat service answers with a non-success status
pub const CONNECTION_FALLBACK: &str = "I'm having trouble connecting right now. Please try again.";

/// Reply used for any other chat failure
pub const ERROR_FALLBACK: &str = "I encountered an error. Could you please repeat that?";

/// Tunables for the dialogue manager
#[derive(Debug, Clone)]
pub struct DialogueOptions {
    /// Stored messages replayed into each request
    pub context_messages: usize,
    /// Persist after every N stored messages
    pub save_every: usize,
}

impl Default for DialogueOptions {
    fn default() -> Self {
        Self {
            context_messages: 10,
            save_every: 10,
        }
    }
}

/// Outcome of a conversational turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Text to render and speak
    pub text: String,
    /// Whether the exchange was committed to history
    pub committed: bool,
}

impl Reply {
    /// Whether this reply is a fallback for a failed request
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        !self.committed
    }
}

/// Owns the conversation history and the per-process site snapshot
pub struct DialogueManager {
    chat: Box<dyn ChatProvider>,
    store: Box<dyn HistoryStore>,
    history: History,
    snapshot: SiteSnapshot,
    options: DialogueOptions,
}

impl DialogueManager {
    /// Create a manager, loading history from the store
    ///
    /// `snapshot` is invoked exactly once; its result stays fixed for the
    /// lifetime of the manager.
    pub fn new<F>(
        chat: Box<dyn ChatProvider>,
        store: Box<dyn HistoryStore>,
        snapshot: F,
        options: DialogueOptions,
    ) -> Self
    where
        F: FnOnce() -> SiteSnapshot,
    {
        let history = store.load();
        Self {
            chat,
            store,
            history,
            snapshot: snapshot(),
            options,
        }
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub const fn snapshot(&self) -> &SiteSnapshot {
        &self.snapshot
    }

    /// The outbound user content for a message, with site data attached if relevant
    #[must_use]
    pub fn outbound_content(&self, message: &str) -> String {
        situation::augment(message, &self.snapshot)
    }

    /// Assemble a request: system instruction, recent history, then the new message
    #[must_use]
    pub fn build_request(&self, outbound: &str) -> Vec<Message> {
        let recent = self.history.recent(self.options.context_messages);

        let mut messages = Vec::with_capacity(recent.len() + 2);
        messages.push(Message::system(SYSTEM_PROMPT));
        messages.extend_from_slice(recent);
        messages.push(Message::user(outbound));
        messages
    }

    /// Run one conversational turn
    ///
    /// On success the (augmented) user message and the reply are appended to
    /// history together. On failure history is untouched and a fallback reply
    /// is returned in place of content.
    pub async fn respond(&mut self, message: &str) -> Reply {
        let outbound = self.outbound_content(message);
        let request = self.build_request(&outbound);

        match self.chat.complete(&request).await {
            Ok(text) => {
                self.history
                    .push_turn(Message::user(outbound), Message::assistant(text.clone()));
                tracing::debug!(stored = self.history.len(), "turn committed");
                Reply {
                    text,
                    committed: true,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "chat completion failed");
                let text = match e {
                    Error::ChatStatus { .. } => CONNECTION_FALLBACK,
                    _ => ERROR_FALLBACK,
                };
                Reply {
                    text: text.to_string(),
                    committed: false,
                }
            }
        }
    }

    /// Whether the stored message count has reached a save checkpoint
    #[must_use]
    pub fn checkpoint_due(&self) -> bool {
        !self.history.is_empty() && self.history.len() % self.options.save_every.max(1) == 0
    }

    /// Persist the whole history; returns whether the write succeeded
    pub fn save(&self) -> bool {
        self.store.save(&self.history)
    }

    /// Empty the history and remove the durable record
    ///
    /// Returns whether the durable record is gone.
    pub fn clear(&mut self) -> bool {
        self.history.clear();
        self.store.delete()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::Result;
    use crate::conversation::Role;

    struct EchoChat {
        requests: Arc<Mutex<Vec<Vec<Message>>>>,
    }

    #[async_trait]
    impl ChatProvider for EchoChat {
        async fn complete(&self, messages: &[Message]) -> Result<String> {
            self.requests.lock().unwrap().push(messages.to_vec());
            let last = messages.last().map(Message::content).unwrap_or_default();
            Ok(format!("echo: {last}"))
        }
    }

    struct FailingChat(fn() -> Error);

    #[async_trait]
    impl ChatProvider for FailingChat {
        async fn complete(&self, _messages: &[Message]) -> Result<String> {
            Err((self.0)())
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        saves: AtomicUsize,
    }

    impl HistoryStore for MemoryStore {
        fn load(&self) -> History {
            History::new()
        }

        fn save(&self, _history: &History) -> bool {
            self.saves.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn delete(&self) -> bool {
            true
        }
    }

    fn snapshot() -> SiteSnapshot {
        SiteSnapshot::simulated(&mut StdRng::seed_from_u64(3))
    }

    fn manager_with(chat: Box<dyn ChatProvider>) -> DialogueManager {
        DialogueManager::new(
            chat,
            Box::<MemoryStore>::default(),
            snapshot,
            DialogueOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_successful_turns_append_pairs() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let mut manager = manager_with(Box::new(EchoChat {
            requests: Arc::clone(&requests),
        }));

        for i in 0..3 {
            let reply = manager.respond(&format!("hello {i}")).await;
            assert!(reply.committed);
        }

        let roles: Vec<Role> = manager.history().messages().iter().map(Message::role).collect();
        assert_eq!(
            roles,
            [Role::User, Role::Assistant, Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
        assert_eq!(manager.history().messages()[4].content(), "hello 2");
        assert_eq!(manager.history().messages()[5].content(), "echo: hello 2");
    }

    #[tokio::test]
    async fn test_request_window_is_bounded() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let mut manager = manager_with(Box::new(EchoChat {
            requests: Arc::clone(&requests),
        }));

        for i in 0..8 {
            manager.respond(&format!("m{i}")).await;
        }

        let last = requests.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.len(), 12);
        assert_eq!(last[0].role(), Role::System);
        assert_eq!(last[1].content(), "m2");
        assert_eq!(last[11].content(), "m7");
        assert_eq!(
            last.iter().filter(|m| m.role() == Role::System).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_status_failure_uses_connection_fallback() {
        let mut manager = manager_with(Box::new(FailingChat(|| Error::ChatStatus {
            status: 429,
            body: "rate limited".to_string(),
        })));

        let reply = manager.respond("hello").await;
        assert_eq!(reply.text, CONNECTION_FALLBACK);
        assert!(reply.is_fallback());
        assert!(manager.history().is_empty());
    }

    #[tokio::test]
    async fn test_other_failure_uses_error_fallback() {
        let mut manager = manager_with(Box::new(FailingChat(|| {
            Error::Chat("response contained no message".to_string())
        })));

        let reply = manager.respond("hello").await;
        assert_eq!(reply.text, ERROR_FALLBACK);
        assert!(manager.history().is_empty());
    }

    #[tokio::test]
    async fn test_augmented_text_is_stored() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let mut manager = manager_with(Box::new(EchoChat {
            requests: Arc::clone(&requests),
        }));

        manager.respond("site status?").await;

        let stored = manager.history().messages()[0].content();
        assert!(stored.starts_with("site status?"));
        assert!(stored.contains("Construction Site Data:"));
    }

    #[test]
    fn test_snapshot_generated_once() {
        let calls = AtomicUsize::new(0);
        let manager = DialogueManager::new(
            Box::new(FailingChat(|| Error::Chat(String::new()))),
            Box::<MemoryStore>::default(),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                snapshot()
            },
            DialogueOptions::default(),
        );

        let first = manager.outbound_content("progress");
        let second = manager.outbound_content("progress");
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_checkpoint_every_ten_messages() {
        let mut manager = manager_with(Box::new(EchoChat {
            requests: Arc::new(Mutex::new(Vec::new())),
        }));

        assert!(!manager.checkpoint_due());
        for turn in 1..=5 {
            manager.respond("hi").await;
            assert_eq!(manager.checkpoint_due(), turn == 5);
        }
    }
}
