//! Interactive first-run setup wizard (`foreman setup`)

use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input};

use crate::config::DEFAULT_MODEL;
use crate::config::file::{
    ApiKeysFileConfig, ForemanConfigFile, LlmFileConfig, VoiceFileConfig,
};

/// Run the interactive setup wizard
///
/// # Errors
///
/// Returns error if user input fails or config cannot be written
pub fn run_setup() -> anyhow::Result<()> {
    println!("Foreman Setup\n");

    let existing = crate::config::file::load_config_file();
    let config_path = crate::config::file::config_file_path()
        .unwrap_or_else(|| PathBuf::from("~/.config/foreman/config.toml"));

    if config_path.exists() {
        println!("Existing config found at {}\n", config_path.display());
    }

    // 1. Chat credential
    let openrouter = ask_key(
        "OpenRouter API key (OPENROUTER_API_KEY)",
        existing.api_keys.openrouter.as_deref(),
    )?;

    // 2. Model
    let default_model = existing.llm.model.as_deref().unwrap_or(DEFAULT_MODEL);
    let model: String = Input::new()
        .with_prompt("Chat model")
        .default(default_model.to_string())
        .interact_text()?;

    // 3. Voice (optional)
    let enable_voice = Confirm::new()
        .with_prompt("Enable voice (microphone input and spoken replies)?")
        .default(existing.voice.enabled.unwrap_or(true))
        .interact()?;

    let openai = if enable_voice {
        ask_key(
            "OpenAI API key for Whisper/TTS (OPENAI_API_KEY)",
            existing.api_keys.openai.as_deref(),
        )?
    } else {
        existing.api_keys.openai
    };

    let config_file = ForemanConfigFile {
        llm: LlmFileConfig {
            model: Some(model),
            ..existing.llm
        },
        voice: VoiceFileConfig {
            enabled: Some(enable_voice),
            ..existing.voice
        },
        history: existing.history,
        api_keys: ApiKeysFileConfig { openrouter, openai },
    };

    write_config(&config_path, &config_file)?;
    println!("\nConfig written to {}", config_path.display());
    println!("\nSetup complete! Run `foreman` to start.");

    Ok(())
}

/// Prompt for a key, keeping the current one on blank input
fn ask_key(prompt: &str, current: Option<&str>) -> anyhow::Result<Option<String>> {
    let prompt = current.map_or_else(
        || prompt.to_string(),
        |k| format!("{prompt} (current: {}, leave blank to keep)", mask(k)),
    );

    let input: String = Input::new()
        .with_prompt(&prompt)
        .allow_empty(true)
        .interact_text()?;

    Ok(if input.trim().is_empty() {
        current.map(str::to_string)
    } else {
        Some(input.trim().to_string())
    })
}

/// Mask all but the ends of a secret
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

/// Serialize and write the config file
fn write_config(path: &Path, config: &ForemanConfigFile) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, toml::to_string_pretty(config)?)?;
    Ok(())
}
