use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use secrecy::{ExposeSecret, SecretString};
use tracing_subscriber::EnvFilter;

use foreman::conversation::{DialogueManager, DialogueOptions, JsonHistoryStore, SiteSnapshot};
use foreman::voice::{
    AudioCapture, AudioPlayback, Language, MicrophoneListener, OpenAiSynthesizer, Speaker,
    VoiceSpeaker, WhisperTranscriber, input_available, rms,
};
use foreman::{Config, OpenRouterClient, Session, TerminalPrompter};

/// Foreman - bilingual voice assistant for construction site updates
#[derive(Parser)]
#[command(name = "foreman", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable voice input and spoken replies
    #[arg(long, env = "FOREMAN_TEXT_ONLY")]
    text_only: bool,

    /// Durable history file (overrides config)
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Chat model identifier (overrides config)
    #[arg(long)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,

        /// Use the secondary (Hindi) voice
        #[arg(long)]
        hindi: bool,
    },
    /// Interactive first-run setup
    Setup,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn,foreman=info",
        1 => "info,foreman=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestTts { text, hindi } => test_tts(&text, hindi).await,
            Command::Setup => foreman::setup::run_setup(),
        };
    }

    let mut config = Config::load_with_options(cli.text_only);
    if let Some(path) = cli.history_file {
        config.history.path = path;
    }
    if let Some(model) = cli.model {
        config.llm.model = model;
    }
    tracing::debug!(?config, "loaded configuration");

    let chat = OpenRouterClient::new(&config.llm, config.api_keys.openrouter.take());
    let store = JsonHistoryStore::new(&config.history.path);
    let manager = DialogueManager::new(
        Box::new(chat),
        Box::new(store),
        || SiteSnapshot::simulated(&mut rand::thread_rng()),
        DialogueOptions {
            context_messages: config.history.context_messages,
            save_every: config.history.save_every,
        },
    );

    let mut session = Session::new(manager, Box::new(TerminalPrompter));

    if config.voice.enabled {
        session = attach_voice(session, &config);
    } else {
        tracing::info!("running in text-only mode");
    }

    session.run().await;
    Ok(())
}

/// Attach whichever voice capabilities are available; missing ones degrade to text
fn attach_voice(mut session: Session, config: &Config) -> Session {
    let openai_key = || {
        config
            .api_keys
            .openai
            .as_ref()
            .map(|k| SecretString::from(k.expose_secret().to_owned()))
    };

    if input_available() {
        match WhisperTranscriber::new(openai_key(), config.voice.stt_model.clone()) {
            Ok(stt) => {
                let listener = MicrophoneListener::new(Box::new(stt), &config.voice);
                session = session.with_voice(Box::new(listener));
            }
            Err(e) => tracing::warn!(error = %e, "voice input disabled"),
        }
    }

    let speaker = OpenAiSynthesizer::new(openai_key(), &config.voice).and_then(|tts| {
        AudioPlayback::new().map(|playback| VoiceSpeaker::new(Box::new(tts), playback))
    });
    match speaker {
        Ok(speaker) => session = session.with_speaker(Box::new(speaker)),
        Err(e) => tracing::warn!(error = %e, "spoken replies disabled"),
    }

    session
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let capture = AudioCapture::open()?;

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.drain();
        let energy = rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );
    }

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("Speech is detected above an RMS of about 0.03.");

    Ok(())
}

/// Test TTS output
#[allow(clippy::future_not_send)]
async fn test_tts(text: &str, hindi: bool) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let mut config = Config::load();
    let synthesizer = OpenAiSynthesizer::new(config.api_keys.openai.take(), &config.voice)?;
    let mut speaker = VoiceSpeaker::new(Box::new(synthesizer), AudioPlayback::new()?);

    let language = if hindi { Language::Hindi } else { Language::English };
    println!("Synthesizing and playing ({language})...");
    speaker.speak(text, language).await?;

    println!("Done.");
    Ok(())
}
