//! Error types for Foreman

use thiserror::Error;

/// Result type alias for Foreman operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Foreman
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device or stream error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Chat completion provider returned a non-success status
    #[error("chat API error {status}: {body}")]
    ChatStatus {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Chat completion failed for any other reason (empty or malformed reply)
    #[error("chat error: {0}")]
    Chat(String),

    /// Durable history error
    #[error("history error: {0}")]
    History(String),

    /// Interactive input error
    #[error("input error: {0}")]
    Input(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
