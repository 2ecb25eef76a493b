//! Speech-to-text (STT) processing

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::Language;
use crate::{Error, Result};

/// Converts captured audio into text in a requested language
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe WAV audio, forcing `language`
    ///
    /// Returns `Ok(None)` when nothing intelligible was recognized.
    ///
    /// # Errors
    ///
    /// Returns error if the transcription service fails
    async fn transcribe(&self, wav: &[u8], language: Language) -> Result<Option<String>>;
}

/// Response from OpenAI Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Transcribes speech with `OpenAI` Whisper
pub struct WhisperTranscriber {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: Option<SecretString>, model: String) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or_else(|| Error::Config("OpenAI API key required for Whisper".to_string()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, wav: &[u8], language: Language) -> Result<Option<String>> {
        tracing::debug!(audio_bytes = wav.len(), %language, "starting Whisper transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(wav.to_vec())
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone())
            .text("language", language.code());

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/transcriptions")
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Whisper request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse response");
            e
        })?;

        Ok(non_empty(result.text))
    }
}

/// Treat blank transcripts as no result
fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A recognized utterance and the language it was recognized in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub language: Language,
}

/// Try each language in order and keep the first recognized result
///
/// A failed attempt (no match or service error) moves on to the next
/// language. Returns `None` when every attempt fails.
pub async fn transcribe_in_order(
    transcriber: &dyn Transcriber,
    wav: &[u8],
    order: &[Language],
) -> Option<Transcript> {
    for &language in order {
        match transcriber.transcribe(wav, language).await {
            Ok(Some(text)) => {
                tracing::info!(transcript = %text, %language, "transcription complete");
                return Some(Transcript { text, language });
            }
            Ok(None) => tracing::debug!(%language, "no match"),
            Err(e) => tracing::warn!(error = %e, %language, "transcription attempt failed"),
        }
    }

    None
}
