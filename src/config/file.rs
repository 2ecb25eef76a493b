//! TOML configuration file loading
//!
//! Supports `~/.config/foreman/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ForemanConfigFile {
    /// Chat completion configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Conversation history configuration
    #[serde(default)]
    pub history: HistoryFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Chat completion settings
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LlmFileConfig {
    /// Model identifier (e.g. "meta-llama/llama-3.3-8b-instruct:free")
    pub model: Option<String>,

    /// OpenAI-compatible API base URL
    pub base_url: Option<String>,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Maximum tokens per reply
    pub max_tokens: Option<u32>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VoiceFileConfig {
    /// Enable voice input/output
    pub enabled: Option<bool>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice for the primary language
    pub tts_voice: Option<String>,

    /// TTS voice for the secondary language
    pub tts_voice_secondary: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f64>,

    /// Seconds to wait for speech to start
    pub listen_timeout_secs: Option<u64>,

    /// Maximum phrase duration in seconds
    pub phrase_limit_secs: Option<u64>,
}

/// Conversation history configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HistoryFileConfig {
    /// Path of the durable history file
    pub path: Option<String>,

    /// Persist after every N stored messages
    pub save_every: Option<usize>,

    /// Number of stored messages replayed into each request
    pub context_messages: Option<usize>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiKeysFileConfig {
    pub openrouter: Option<String>,
    pub openai: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ForemanConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ForemanConfigFile {
    config_file_path().map_or_else(ForemanConfigFile::default, |path| load_from(&path))
}

/// Load a TOML config file from an explicit path, falling back to defaults
pub fn load_from(path: &Path) -> ForemanConfigFile {
    if !path.exists() {
        return ForemanConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ForemanConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ForemanConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/foreman/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("foreman").join("config.toml"))
}
