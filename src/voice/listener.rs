//! Voice input: bounded microphone capture followed by ordered transcription

use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
use super::detector::{DetectorState, SpeechDetector};
use super::stt::{Transcriber, Transcript, transcribe_in_order};
use super::{Language, TRANSCRIPTION_ORDER};
use crate::config::VoiceConfig;

/// Polling interval while capturing
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of one listen attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    /// Speech was recognized
    Heard(Transcript),
    /// No speech started within the listen timeout
    NoSpeech,
    /// Speech was captured but no language recognized it
    NotUnderstood,
    /// The microphone or encoder failed
    Failed(String),
}

/// Acquires one spoken utterance
#[async_trait(?Send)]
pub trait VoiceInput {
    /// Listen for a single phrase
    async fn listen(&mut self) -> ListenOutcome;
}

/// Captures from the default microphone and transcribes with fallback languages
pub struct MicrophoneListener {
    transcriber: Box<dyn Transcriber>,
    languages: Vec<Language>,
    listen_timeout: Duration,
    phrase_limit: Duration,
}

impl MicrophoneListener {
    #[must_use]
    pub fn new(transcriber: Box<dyn Transcriber>, config: &VoiceConfig) -> Self {
        Self {
            transcriber,
            languages: TRANSCRIPTION_ORDER.to_vec(),
            listen_timeout: config.listen_timeout,
            phrase_limit: config.phrase_limit,
        }
    }

    /// Capture one phrase, `None` if speech never started
    async fn capture_phrase(&self) -> crate::Result<Option<Vec<f32>>> {
        let capture = AudioCapture::open()?;
        let mut detector = SpeechDetector::new(self.listen_timeout, self.phrase_limit);

        // A silent device delivers no samples at all; bound wall time too
        let deadline = Instant::now() + self.listen_timeout + self.phrase_limit + Duration::from_secs(1);

        loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            match detector.feed(&capture.drain()) {
                DetectorState::Complete => return Ok(Some(detector.take_phrase())),
                DetectorState::TimedOut => return Ok(None),
                DetectorState::Waiting if Instant::now() >= deadline => return Ok(None),
                DetectorState::Speaking if Instant::now() >= deadline => {
                    return Ok(Some(detector.take_phrase()));
                }
                DetectorState::Waiting | DetectorState::Speaking => {}
            }
        }
    }
}

#[async_trait(?Send)]
impl VoiceInput for MicrophoneListener {
    async fn listen(&mut self) -> ListenOutcome {
        let phrase = match self.capture_phrase().await {
            Ok(Some(phrase)) => phrase,
            Ok(None) => return ListenOutcome::NoSpeech,
            Err(e) => {
                tracing::error!(error = %e, "voice capture failed");
                return ListenOutcome::Failed(e.to_string());
            }
        };

        let wav = match samples_to_wav(&phrase, SAMPLE_RATE) {
            Ok(wav) => wav,
            Err(e) => return ListenOutcome::Failed(e.to_string()),
        };

        transcribe_in_order(self.transcriber.as_ref(), &wav, &self.languages)
            .await
            .map_or(ListenOutcome::NotUnderstood, ListenOutcome::Heard)
    }
}
