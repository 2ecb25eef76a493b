//! Energy-based speech detection over a bounded listen window
//!
//! Adapted from the classic VAD loop: compute RMS per chunk, start a phrase
//! once energy crosses the threshold, end it on trailing silence. The window
//! is bounded twice: speech must start within `listen_timeout`, and a phrase
//! is cut off at `phrase_limit`.

use std::time::Duration;

use super::capture::SAMPLE_RATE;

/// Minimum RMS energy considered speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum phrase length (0.3 s at 16 kHz)
const MIN_SPEECH_SAMPLES: usize = 4800;

/// Trailing silence that ends a phrase (0.5 s at 16 kHz)
const SILENCE_SAMPLES: usize = 8000;

/// State of a listen window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Waiting for speech to start
    Waiting,
    /// Speech started, accumulating the phrase
    Speaking,
    /// A phrase was captured
    Complete,
    /// No speech started within the listen timeout
    TimedOut,
}

impl DetectorState {
    /// Whether the window is finished
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Complete | Self::TimedOut)
    }
}

/// Detects a single spoken phrase in a stream of samples
pub struct SpeechDetector {
    state: DetectorState,
    timeout_samples: usize,
    phrase_limit_samples: usize,
    waited: usize,
    phrase: Vec<f32>,
    silence: usize,
}

fn duration_to_samples(duration: Duration) -> usize {
    let samples = duration.as_millis() * u128::from(SAMPLE_RATE) / 1000;
    usize::try_from(samples).unwrap_or(usize::MAX)
}

impl SpeechDetector {
    /// Create a detector for one listen window
    #[must_use]
    pub fn new(listen_timeout: Duration, phrase_limit: Duration) -> Self {
        Self {
            state: DetectorState::Waiting,
            timeout_samples: duration_to_samples(listen_timeout),
            phrase_limit_samples: duration_to_samples(phrase_limit),
            waited: 0,
            phrase: Vec::new(),
            silence: 0,
        }
    }

    /// Feed a chunk of 16 kHz mono samples and return the updated state
    pub fn feed(&mut self, samples: &[f32]) -> DetectorState {
        if self.state.is_done() || samples.is_empty() {
            return self.state;
        }

        let energy = rms(samples);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            DetectorState::Waiting => {
                if is_speech {
                    tracing::trace!(energy, "speech started");
                    self.state = DetectorState::Speaking;
                    self.phrase.extend_from_slice(samples);
                } else {
                    self.waited += samples.len();
                    if self.waited >= self.timeout_samples {
                        tracing::debug!("no speech within listen timeout");
                        self.state = DetectorState::TimedOut;
                    }
                }
            }
            DetectorState::Speaking => {
                self.phrase.extend_from_slice(samples);

                if is_speech {
                    self.silence = 0;
                } else {
                    self.silence += samples.len();
                }

                if self.silence > SILENCE_SAMPLES && self.phrase.len() > MIN_SPEECH_SAMPLES {
                    tracing::debug!(samples = self.phrase.len(), "phrase complete");
                    self.state = DetectorState::Complete;
                } else if self.phrase.len() >= self.phrase_limit_samples {
                    tracing::debug!(samples = self.phrase.len(), "phrase limit reached");
                    self.phrase.truncate(self.phrase_limit_samples);
                    self.state = DetectorState::Complete;
                }
            }
            DetectorState::Complete | DetectorState::TimedOut => {}
        }

        self.state
    }

    #[must_use]
    pub const fn state(&self) -> DetectorState {
        self.state
    }

    /// Take the captured phrase
    pub fn take_phrase(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.phrase)
    }
}

/// RMS energy of a chunk
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 100 ms chunks at 16 kHz
    const CHUNK: usize = 1600;

    fn tone(chunks: usize) -> Vec<Vec<f32>> {
        #[allow(clippy::cast_precision_loss)]
        let chunk: Vec<f32> = (0..CHUNK)
            .map(|i| 0.3 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16_000.0).sin())
            .collect();
        vec![chunk; chunks]
    }

    fn silence(chunks: usize) -> Vec<Vec<f32>> {
        vec![vec![0.0; CHUNK]; chunks]
    }

    fn detector() -> SpeechDetector {
        SpeechDetector::new(Duration::from_secs(5), Duration::from_secs(10))
    }

    #[test]
    fn test_rms() {
        assert!(rms(&[0.0; 100]) < 0.001);
        assert!(rms(&[0.5; 100]) > 0.4);
        assert!(rms(&[]).abs() < f32::EPSILON);
    }

    #[test]
    fn test_times_out_without_speech() {
        let mut detector = detector();
        for chunk in silence(49) {
            assert_eq!(detector.feed(&chunk), DetectorState::Waiting);
        }
        assert_eq!(detector.feed(&silence(1)[0]), DetectorState::TimedOut);
        assert!(detector.take_phrase().is_empty());
    }

    #[test]
    fn test_phrase_ends_on_silence() {
        let mut detector = detector();
        for chunk in silence(3) {
            detector.feed(&chunk);
        }
        for chunk in tone(10) {
            assert_eq!(detector.feed(&chunk), DetectorState::Speaking);
        }
        let mut state = DetectorState::Speaking;
        for chunk in silence(6) {
            state = detector.feed(&chunk);
        }

        assert_eq!(state, DetectorState::Complete);
        assert_eq!(detector.take_phrase().len(), 16 * CHUNK);
    }

    #[test]
    fn test_phrase_limit_cuts_off() {
        let mut detector = SpeechDetector::new(Duration::from_secs(5), Duration::from_secs(2));
        let mut state = DetectorState::Waiting;
        for chunk in tone(30) {
            state = detector.feed(&chunk);
            if state.is_done() {
                break;
            }
        }

        assert_eq!(state, DetectorState::Complete);
        assert_eq!(detector.take_phrase().len(), 32_000);
    }

    #[test]
    fn test_done_state_is_sticky() {
        let mut detector = SpeechDetector::new(Duration::from_millis(100), Duration::from_secs(1));
        assert_eq!(detector.feed(&silence(1)[0]), DetectorState::TimedOut);
        assert_eq!(detector.feed(&tone(1)[0]), DetectorState::TimedOut);
    }
}
