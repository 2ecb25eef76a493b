//! Configuration management for Foreman

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use self::file::ForemanConfigFile;

/// Default chat model served through `OpenRouter`
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-8b-instruct:free";

/// Default OpenAI-compatible chat endpoint base
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Foreman configuration
#[derive(Debug)]
pub struct Config {
    /// Chat completion configuration
    pub llm: LlmConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// Conversation history configuration
    pub history: HistoryConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// Chat completion configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API base URL (the `/chat/completions` path is appended)
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens per reply
    pub max_tokens: u32,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable voice input and spoken replies
    pub enabled: bool,

    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice used for the primary language
    pub tts_voice: String,

    /// TTS voice used for the secondary language
    pub tts_voice_secondary: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,

    /// How long to wait for speech to start
    pub listen_timeout: Duration,

    /// Maximum duration of a single phrase
    pub phrase_limit: Duration,
}

/// Conversation history configuration
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Durable history file
    pub path: PathBuf,

    /// Persist after every N stored messages
    pub save_every: usize,

    /// Stored messages replayed into each request
    pub context_messages: usize,
}

/// API keys for external services
#[derive(Debug, Default)]
pub struct ApiKeys {
    /// `OpenRouter` API key (chat completion bearer credential)
    /// See: <https://openrouter.ai/keys>
    pub openrouter: Option<SecretString>,

    /// `OpenAI` API key (Whisper and TTS)
    pub openai: Option<SecretString>,
}

/// Default history file: `~/.local/share/foreman/conversation_history.json`
pub fn default_history_path() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from("conversation_history.json"),
        |d| d.data_dir().join("foreman").join("conversation_history.json"),
    )
}

impl Config {
    /// Load configuration (env > toml > default)
    #[must_use]
    pub fn load() -> Self {
        Self::load_with_options(false)
    }

    /// Load configuration with explicit voice disable option
    #[must_use]
    pub fn load_with_options(disable_voice: bool) -> Self {
        let fc = file::load_config_file();
        let config = Self::from_sources(fc, |key| std::env::var(key).ok(), disable_voice);

        if disable_voice {
            tracing::info!("voice explicitly disabled via --text-only");
        }

        config
    }

    /// Build configuration from a parsed config file and an environment lookup
    pub fn from_sources<F>(fc: ForemanConfigFile, env: F, disable_voice: bool) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|v| !v.is_empty());

        let api_keys = ApiKeys {
            openrouter: non_empty("OPENROUTER_API_KEY")
                .or(fc.api_keys.openrouter)
                .map(SecretString::from),
            openai: non_empty("OPENAI_API_KEY")
                .or(fc.api_keys.openai)
                .map(SecretString::from),
        };

        let llm = LlmConfig {
            base_url: fc
                .llm
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: non_empty("FOREMAN_MODEL")
                .or(fc.llm.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: fc.llm.temperature.unwrap_or(0.7),
            max_tokens: fc.llm.max_tokens.unwrap_or(150),
        };

        let voice = VoiceConfig {
            enabled: !disable_voice && fc.voice.enabled.unwrap_or(true),
            stt_model: non_empty("FOREMAN_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or_else(|| "whisper-1".to_string()),
            tts_model: non_empty("FOREMAN_TTS_MODEL")
                .or(fc.voice.tts_model)
                .unwrap_or_else(|| "tts-1".to_string()),
            tts_voice: fc.voice.tts_voice.unwrap_or_else(|| "nova".to_string()),
            tts_voice_secondary: fc
                .voice
                .tts_voice_secondary
                .unwrap_or_else(|| "shimmer".to_string()),
            tts_speed: fc.voice.tts_speed.unwrap_or(1.0),
            listen_timeout: Duration::from_secs(fc.voice.listen_timeout_secs.unwrap_or(5)),
            phrase_limit: Duration::from_secs(fc.voice.phrase_limit_secs.unwrap_or(10)),
        };

        let history = HistoryConfig {
            path: non_empty("FOREMAN_HISTORY_FILE")
                .or(fc.history.path)
                .map_or_else(default_history_path, PathBuf::from),
            save_every: fc.history.save_every.filter(|n| *n > 0).unwrap_or(10),
            context_messages: fc.history.context_messages.unwrap_or(10),
        };

        Self {
            llm,
            voice,
            history,
            api_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_sources(ForemanConfigFile::default(), env_from(&[]), false);

        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.max_tokens, 150);
        assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.history.save_every, 10);
        assert_eq!(config.history.context_messages, 10);
        assert_eq!(config.voice.listen_timeout, Duration::from_secs(5));
        assert_eq!(config.voice.phrase_limit, Duration::from_secs(10));
        assert!(config.voice.enabled);
        assert!(config.api_keys.openrouter.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut fc = ForemanConfigFile::default();
        fc.llm.model = Some("file-model".to_string());
        fc.api_keys.openrouter = Some("file-key".to_string());

        let config = Config::from_sources(
            fc,
            env_from(&[("FOREMAN_MODEL", "env-model"), ("OPENROUTER_API_KEY", "env-key")]),
            false,
        );

        assert_eq!(config.llm.model, "env-model");
        assert_eq!(
            config.api_keys.openrouter.as_ref().map(|k| k.expose_secret()),
            Some("env-key")
        );
    }

    #[test]
    fn test_empty_env_key_is_ignored() {
        let config = Config::from_sources(
            ForemanConfigFile::default(),
            env_from(&[("OPENROUTER_API_KEY", "")]),
            false,
        );
        assert!(config.api_keys.openrouter.is_none());
    }

    #[test]
    fn test_disable_voice_wins() {
        let mut fc = ForemanConfigFile::default();
        fc.voice.enabled = Some(true);

        let config = Config::from_sources(fc, env_from(&[]), true);
        assert!(!config.voice.enabled);
    }

    #[test]
    fn test_zero_save_interval_uses_default() {
        let mut fc = ForemanConfigFile::default();
        fc.history.save_every = Some(0);

        let config = Config::from_sources(fc, env_from(&[]), false);
        assert_eq!(config.history.save_every, 10);
    }
}
