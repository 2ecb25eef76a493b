//! Text-to-speech (TTS) processing

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::Language;
use crate::config::VoiceConfig;
use crate::{Error, Result};

/// Renders text as MP3 audio in a given language
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text`
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>>;
}

/// Synthesizes speech with the `OpenAI` speech API
///
/// The API infers pronunciation from the text itself, so language selects
/// the voice rather than a locale parameter.
pub struct OpenAiSynthesizer {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    primary_voice: String,
    secondary_voice: String,
    speed: f64,
}

impl OpenAiSynthesizer {
    /// Create a new `OpenAI` synthesizer
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: Option<SecretString>, config: &VoiceConfig) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or_else(|| Error::Config("OpenAI API key required for TTS".to_string()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: config.tts_model.clone(),
            primary_voice: config.tts_voice.clone(),
            secondary_voice: config.tts_voice_secondary.clone(),
            speed: config.tts_speed.clamp(0.25, 4.0),
        })
    }

    fn voice_for(&self, language: Language) -> &str {
        match language {
            Language::English => &self.primary_voice,
            Language::Hindi => &self.secondary_voice,
        }
    }
}

#[async_trait]
impl Synthesizer for OpenAiSynthesizer {
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f64,
            response_format: &'a str,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: self.voice_for(language),
            speed: self.speed,
            response_format: "mp3",
        };

        tracing::debug!(chars = text.len(), %language, voice = request.voice, "synthesizing speech");

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn voice_config() -> VoiceConfig {
        VoiceConfig {
            enabled: true,
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "nova".to_string(),
            tts_voice_secondary: "shimmer".to_string(),
            tts_speed: 9.0,
            listen_timeout: Duration::from_secs(5),
            phrase_limit: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_requires_key() {
        assert!(OpenAiSynthesizer::new(None, &voice_config()).is_err());
        assert!(OpenAiSynthesizer::new(Some(SecretString::from(String::new())), &voice_config()).is_err());
    }

    #[test]
    fn test_voice_per_language_and_speed_clamp() {
        let synth =
            OpenAiSynthesizer::new(Some(SecretString::from("k".to_string())), &voice_config()).unwrap();

        assert_eq!(synth.voice_for(Language::English), "nova");
        assert_eq!(synth.voice_for(Language::Hindi), "shimmer");
        assert!((synth.speed - 4.0).abs() < f64::EPSILON);
    }
}
