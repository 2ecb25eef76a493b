//! Spoken replies: synthesis followed by synchronous playback

use std::io::Write;

use async_trait::async_trait;

use super::{AudioPlayback, Language, Synthesizer};
use crate::Result;

/// Speaks text aloud, returning once playback has finished
#[async_trait(?Send)]
pub trait Speaker {
    /// Speak `text` in `language`
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    async fn speak(&mut self, text: &str, language: Language) -> Result<()>;
}

/// Synthesizes each utterance into a temporary MP3 file and plays it
pub struct VoiceSpeaker {
    synthesizer: Box<dyn Synthesizer>,
    playback: AudioPlayback,
}

impl VoiceSpeaker {
    #[must_use]
    pub fn new(synthesizer: Box<dyn Synthesizer>, playback: AudioPlayback) -> Self {
        Self {
            synthesizer,
            playback,
        }
    }
}

#[async_trait(?Send)]
impl Speaker for VoiceSpeaker {
    async fn speak(&mut self, text: &str, language: Language) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let audio = self.synthesizer.synthesize(text, language).await?;

        // The temp file is removed on drop if anything below fails early
        let mut file = tempfile::Builder::new()
            .prefix("foreman-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(&audio)?;
        file.flush()?;

        let played = self.playback.play_mp3_file(file.path());

        let path = file.path().to_path_buf();
        if let Err(e) = file.close() {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary audio file");
        }

        played
    }
}
