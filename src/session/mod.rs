//! Turn-by-turn session loop
//!
//! ```text
//!   Idle ──► AwaitingInput ──┬─► Command ──► AwaitingInput
//!                 ▲          │
//!                 │          └─► Responding ──┐
//!                 └───────────────────────────┘
//!   quit/EOF ──► Ended (history persisted, farewell spoken)
//! ```
//!
//! Everything is sequential: one provider call at a time, each awaited to
//! completion before the next state is entered.

mod prompt;
mod render;

use std::fmt::Display;
use std::io::Write;

use rand::seq::SliceRandom;

use crate::conversation::{DialogueManager, Input, is_confirmed};
use crate::voice::{Language, ListenOutcome, Speaker, VoiceInput};

pub use prompt::{Prompter, TerminalPrompter};
pub use render::{SUMMARY_MESSAGES, full_listing, recent_summary, truncate};

const INPUT_PROMPT: &str = "You (type your message or press Enter to speak)";
const TEXT_ONLY_PROMPT: &str = "You (type your message)";
const CLEAR_PROMPT: &str = "Are you sure you want to clear all history? (yes/no)";

/// Opening lines, one picked at random per session
pub const GREETINGS: [&str; 4] = [
    "Hello! I'm your Riverwood AI assistant. How can I help you today?",
    "Namaste! Main aapki Riverwood AI assistant hoon. Aaj main aapki kaise madad kar sakti hoon?",
    "Hi there! Welcome to Riverwood. What can I do for you?",
    "Namaskar! Riverwood mein aapka swagat hai. Main aapki kya seva kar sakti hoon?",
];

/// Farewell spoken in the session's current language
#[must_use]
pub const fn farewell(language: Language) -> &'static str {
    match language {
        Language::English => "Goodbye! Have a great day!",
        Language::Hindi => "Namaste! Aapka din shubh ho!",
    }
}

/// Session loop state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Not started
    Idle,
    /// Waiting for typed or spoken input
    AwaitingInput,
    /// Handling a command
    Command(Input),
    /// Waiting on the chat provider for a message
    Responding(String),
    /// Terminal state
    Ended,
}

/// Drives the conversation with one user
pub struct Session {
    manager: DialogueManager,
    prompter: Box<dyn Prompter>,
    voice: Option<Box<dyn VoiceInput>>,
    speaker: Option<Box<dyn Speaker>>,
    out: Box<dyn Write>,
    language: Language,
    state: SessionState,
}

impl Session {
    /// Create a text-only session writing to stdout
    #[must_use]
    pub fn new(manager: DialogueManager, prompter: Box<dyn Prompter>) -> Self {
        Self {
            manager,
            prompter,
            voice: None,
            speaker: None,
            out: Box::new(std::io::stdout()),
            language: Language::default(),
            state: SessionState::Idle,
        }
    }

    /// Accept spoken input on empty lines
    #[must_use]
    pub fn with_voice(mut self, voice: Box<dyn VoiceInput>) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Speak agent lines aloud
    #[must_use]
    pub fn with_speaker(mut self, speaker: Box<dyn Speaker>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    /// Redirect the transcript
    #[must_use]
    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    #[must_use]
    pub const fn manager(&self) -> &DialogueManager {
        &self.manager
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Most recently recognized spoken language
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Run until the user quits or input is exhausted
    ///
    /// A failing input source ends the session the same way `quit` does, so
    /// history is always persisted before this returns.
    pub async fn run(&mut self) {
        self.print_intro();
        self.greet().await;

        self.state = SessionState::AwaitingInput;
        while self.state != SessionState::Ended {
            self.step().await;
        }

        self.say("");
        self.say(render::rule());
        self.say("Thank you for using Foreman!");
        self.say(render::rule());
    }

    /// Advance the state machine by one transition
    pub async fn step(&mut self) {
        let state = std::mem::replace(&mut self.state, SessionState::AwaitingInput);
        self.state = match state {
            SessionState::Idle | SessionState::AwaitingInput => self.acquire_input().await,
            SessionState::Command(Input::Quit) => {
                self.end().await;
                SessionState::Ended
            }
            SessionState::Command(command) => {
                self.handle_command(&command);
                SessionState::AwaitingInput
            }
            SessionState::Responding(message) => {
                self.respond(&message).await;
                SessionState::AwaitingInput
            }
            SessionState::Ended => SessionState::Ended,
        };
    }

    /// Read typed input, falling back to voice on an empty line
    async fn acquire_input(&mut self) -> SessionState {
        let prompt = if self.voice.is_some() {
            INPUT_PROMPT
        } else {
            TEXT_ONLY_PROMPT
        };

        self.say("");
        let Some(line) = self.read_line(prompt) else {
            tracing::info!("input closed, ending session");
            return SessionState::Command(Input::Quit);
        };

        let text = if line.is_empty() {
            match self.listen().await {
                Some(text) => text,
                None => return SessionState::AwaitingInput,
            }
        } else {
            line
        };

        match Input::classify(&text) {
            Input::Message(message) => SessionState::Responding(message),
            command => SessionState::Command(command),
        }
    }

    /// One voice capture; `None` means stay in `AwaitingInput`
    async fn listen(&mut self) -> Option<String> {
        let voice = self.voice.as_mut()?;

        writeln_or_log(&mut self.out, "\nListening... (Speak now)");
        match voice.listen().await {
            ListenOutcome::Heard(transcript) => {
                self.language = transcript.language;
                tracing::debug!(language = %self.language, "session language updated");
                Some(transcript.text)
            }
            ListenOutcome::NoSpeech => {
                self.say("No speech detected. Please try again.");
                None
            }
            ListenOutcome::NotUnderstood => {
                self.say("Sorry, I couldn't understand that. Please try again.");
                None
            }
            ListenOutcome::Failed(e) => {
                self.say(format!("Error listening: {e}"));
                None
            }
        }
    }

    fn handle_command(&mut self, command: &Input) {
        match command {
            Input::FullHistory => {
                let messages = self.manager.history().messages();
                let lines = if messages.is_empty() {
                    vec![String::new(), "No conversation history available.".to_string()]
                } else {
                    full_listing(messages)
                };
                for line in lines {
                    self.say(line);
                }
                if !self.manager.history().is_empty() {
                    self.read_line("Press Enter to continue...");
                }
            }
            Input::RecentHistory => {
                if self.manager.history().is_empty() {
                    self.say("No conversation history available.");
                } else {
                    for line in recent_summary(self.manager.history().messages()) {
                        self.say(line);
                    }
                }
            }
            Input::ClearHistory => {
                let answer = self.read_line(CLEAR_PROMPT).unwrap_or_default();
                if is_confirmed(&answer) {
                    if !self.manager.clear() {
                        tracing::warn!("durable history could not be removed");
                    }
                    self.say("\nConversation history cleared!");
                } else {
                    self.say("\nHistory not cleared.");
                }
            }
            Input::Quit | Input::Message(_) => {}
        }
    }

    /// Read one line; a failed read counts as closed input
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        match self.prompter.read_line(prompt) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "input failed, treating as closed");
                None
            }
        }
    }

    async fn respond(&mut self, message: &str) {
        self.say(format!("You: {message}"));
        self.say("Thinking...");

        let reply = self.manager.respond(message).await;

        self.say(format!("\nAgent: {}", reply.text));
        self.speak(&reply.text).await;

        if reply.committed && self.manager.checkpoint_due() {
            self.persist();
        }
    }

    async fn end(&mut self) {
        self.persist();

        let farewell = farewell(self.language);
        self.say(format!("\nAgent: {farewell}"));
        self.speak(farewell).await;
    }

    async fn greet(&mut self) {
        let greeting = GREETINGS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(GREETINGS[0]);
        self.say(format!("\nAgent: {greeting}"));
        self.speak(greeting).await;
    }

    fn print_intro(&mut self) {
        let rule = render::rule();
        let mut lines = vec![
            rule.clone(),
            "FOREMAN - RIVERWOOD AI VOICE AGENT".to_string(),
            rule.clone(),
            "\nInstructions:".to_string(),
        ];
        if self.voice.is_some() {
            lines.push("- Press Enter to speak via microphone".to_string());
        }
        lines.extend(
            [
                "- Type your message to chat via text",
                "- Type 'history' to view conversation history",
                "- Type 'recent history' to view the last few messages",
                "- Type 'clear history' to clear all history",
                "- Type 'quit' or 'exit' to end the conversation",
            ]
            .map(String::from),
        );
        lines.push(rule);
        for line in lines {
            self.say(line);
        }

        let loaded = self.manager.history().len();
        if loaded > 0 {
            self.say(format!("\n[Loaded {loaded} previous messages from history]"));
            for line in recent_summary(self.manager.history().messages()) {
                self.say(line);
            }
        }
    }

    fn persist(&mut self) {
        if self.manager.save() {
            let count = self.manager.history().len();
            self.say(format!("\n[Conversation history saved: {count} messages]"));
        } else {
            self.say("Warning: Could not save conversation history");
        }
    }

    async fn speak(&mut self, text: &str) {
        let Some(speaker) = self.speaker.as_mut() else {
            return;
        };

        let language = Language::for_speech(self.language, text);
        if let Err(e) = speaker.speak(text, language).await {
            tracing::warn!(error = %e, "speech output failed");
        }
    }

    fn say(&mut self, line: impl Display) {
        writeln_or_log(&mut self.out, line);
    }
}

fn writeln_or_log(out: &mut dyn Write, line: impl Display) {
    if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
        tracing::warn!(error = %e, "failed to write to terminal");
    }
}
