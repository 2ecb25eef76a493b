//! Spoken languages supported by the assistant

/// A spoken language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Primary language
    #[default]
    English,
    /// Secondary language
    Hindi,
}

/// Transcription attempts per capture, in order
pub const TRANSCRIPTION_ORDER: [Language; 2] = [Language::English, Language::Hindi];

impl Language {
    /// ISO-639-1 code passed to speech services
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
        }
    }

    /// Regional locale used for recognition
    #[must_use]
    pub const fn locale(self) -> &'static str {
        match self {
            Self::English => "en-IN",
            Self::Hindi => "hi-IN",
        }
    }

    /// Language to synthesize `text` in, given the session preference
    ///
    /// Any non-ASCII character (Devanagari, for instance) forces Hindi.
    #[must_use]
    pub fn for_speech(preference: Self, text: &str) -> Self {
        if preference == Self::Hindi || !text.is_ascii() {
            Self::Hindi
        } else {
            Self::English
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
