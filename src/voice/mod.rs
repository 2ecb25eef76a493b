//! Voice processing module
//!
//! Handles microphone capture with speech detection, transcription with
//! language fallback, and spoken replies.

mod capture;
mod detector;
mod language;
mod listener;
mod playback;
mod speaker;
mod stt;
mod tts;

pub use capture::{AudioCapture, SAMPLE_RATE, input_available, samples_to_wav};
pub use detector::{DetectorState, SpeechDetector, rms};
pub use language::{Language, TRANSCRIPTION_ORDER};
pub use listener::{ListenOutcome, MicrophoneListener, VoiceInput};
pub use playback::{AudioPlayback, decode_mp3};
pub use speaker::{Speaker, VoiceSpeaker};
pub use stt::{Transcriber, Transcript, WhisperTranscriber, transcribe_in_order};
pub use tts::{OpenAiSynthesizer, Synthesizer};
