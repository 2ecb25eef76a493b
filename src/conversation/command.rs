//! Classification of raw input into commands or conversational messages

/// Phrases that end the session
pub const TERMINATION_PHRASES: [&str; 4] = ["quit", "exit", "bye", "goodbye"];

/// What a line of user input means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// End the session
    Quit,
    /// List the recent exchanges
    RecentHistory,
    /// List the full stored history
    FullHistory,
    /// Clear the history (after confirmation)
    ClearHistory,
    /// Anything else is a conversational message
    Message(String),
}

impl Input {
    /// Classify raw input against the closed command vocabulary
    ///
    /// Matching is case-insensitive on the trimmed input and tolerates runs of
    /// inner whitespace and trailing punctuation (so a transcribed "Goodbye."
    /// still ends the session). Everything else is a message, passed on with
    /// surrounding whitespace removed.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        let normalized = normalize(trimmed);

        match normalized.as_str() {
            s if TERMINATION_PHRASES.contains(&s) => Self::Quit,
            "history" | "full history" => Self::FullHistory,
            "recent history" => Self::RecentHistory,
            "clear history" => Self::ClearHistory,
            _ => Self::Message(trimmed.to_string()),
        }
    }

    /// Whether this input bypasses the chat provider
    #[must_use]
    pub const fn is_command(&self) -> bool {
        !matches!(self, Self::Message(_))
    }
}

/// Interpret a confirmation answer; only a literal "yes" confirms
#[must_use]
pub fn is_confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

fn normalize(input: &str) -> String {
    input
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
