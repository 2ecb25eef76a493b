//! Shared test utilities
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use foreman::conversation::{
    DialogueManager, DialogueOptions, History, HistoryStore, Message, SiteSnapshot,
};
use foreman::voice::{Language, ListenOutcome, Speaker, VoiceInput};
use foreman::{ChatProvider, Error, Prompter, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Deterministic site snapshot
pub fn fixed_snapshot() -> SiteSnapshot {
    SiteSnapshot::simulated(&mut StdRng::seed_from_u64(42))
}

/// Prompter that replays scripted lines, then reports end of input
#[derive(Clone, Default)]
pub struct ScriptedPrompter {
    lines: Arc<Mutex<VecDeque<String>>>,
    fail_when_empty: bool,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: Arc::new(Mutex::new(lines.iter().map(|l| (*l).to_string()).collect())),
            fail_when_empty: false,
            prompts: Arc::default(),
        }
    }

    /// Replay `lines`, then fail every read like an interrupted terminal
    pub fn failing_after(lines: &[&str]) -> Self {
        Self {
            fail_when_empty: true,
            ..Self::new(lines)
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.lines.lock().unwrap().pop_front() {
            Some(line) => Ok(Some(line)),
            None if self.fail_when_empty => Err(Error::Input("Interrupted".to_string())),
            None => Ok(None),
        }
    }
}

/// How the fake chat provider answers
#[derive(Clone, Copy)]
pub enum ChatBehavior {
    /// Reply "reply N" for the Nth request
    Numbered,
    /// Fail with a non-success status
    Status(u16),
    /// Fail with a malformed response
    Malformed,
}

/// Chat provider that records every request
#[derive(Clone)]
pub struct FakeChat {
    behavior: Arc<Mutex<ChatBehavior>>,
    pub requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl FakeChat {
    pub fn new(behavior: ChatBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            requests: Arc::default(),
        }
    }

    pub fn set_behavior(&self, behavior: ChatBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Vec<Message> {
        self.requests.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for FakeChat {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let n = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(messages.to_vec());
            requests.len()
        };

        match *self.behavior.lock().unwrap() {
            ChatBehavior::Numbered => Ok(format!("reply {n}")),
            ChatBehavior::Status(status) => Err(Error::ChatStatus {
                status,
                body: "upstream error".to_string(),
            }),
            ChatBehavior::Malformed => Err(Error::Chat("response contained no message".to_string())),
        }
    }
}

/// In-memory store that records saves and deletes
#[derive(Clone, Default)]
pub struct RecordingStore {
    initial: History,
    pub saved: Arc<Mutex<Vec<usize>>>,
    pub deletes: Arc<Mutex<usize>>,
}

impl RecordingStore {
    pub fn with_history(history: History) -> Self {
        Self {
            initial: history,
            ..Self::default()
        }
    }

    /// Message counts at each save
    pub fn saves(&self) -> Vec<usize> {
        self.saved.lock().unwrap().clone()
    }
}

impl HistoryStore for RecordingStore {
    fn load(&self) -> History {
        self.initial.clone()
    }

    fn save(&self, history: &History) -> bool {
        self.saved.lock().unwrap().push(history.len());
        true
    }

    fn delete(&self) -> bool {
        *self.deletes.lock().unwrap() += 1;
        true
    }
}

/// Build a manager over the given fakes with default options
pub fn manager(chat: &FakeChat, store: Box<dyn HistoryStore>) -> DialogueManager {
    DialogueManager::new(
        Box::new(chat.clone()),
        store,
        fixed_snapshot,
        DialogueOptions::default(),
    )
}

/// Voice input that replays scripted outcomes
pub struct ScriptedVoice {
    outcomes: VecDeque<ListenOutcome>,
    pub listens: Arc<Mutex<usize>>,
}

impl ScriptedVoice {
    pub fn new(outcomes: Vec<ListenOutcome>) -> Self {
        Self {
            outcomes: outcomes.into(),
            listens: Arc::default(),
        }
    }
}

#[async_trait(?Send)]
impl VoiceInput for ScriptedVoice {
    async fn listen(&mut self) -> ListenOutcome {
        *self.listens.lock().unwrap() += 1;
        self.outcomes.pop_front().unwrap_or(ListenOutcome::NoSpeech)
    }
}

/// Speaker that records what it was asked to say
#[derive(Clone, Default)]
pub struct RecordingSpeaker {
    pub spoken: Arc<Mutex<Vec<(String, Language)>>>,
}

#[async_trait(?Send)]
impl Speaker for RecordingSpeaker {
    async fn speak(&mut self, text: &str, language: Language) -> Result<()> {
        self.spoken.lock().unwrap().push((text.to_string(), language));
        Ok(())
    }
}

/// Transcript sink shared with the test
#[derive(Clone, Default)]
pub struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
