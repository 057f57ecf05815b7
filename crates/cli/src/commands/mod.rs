//! CLI command implementations.

pub mod ask;
pub mod chat;

use std::sync::Arc;

use rummage_agent::TurnRunner;
use rummage_config::AppConfig;
use rummage_core::event::EventBus;
use rummage_providers::GeminiClient;

/// Load the config and assemble the process-wide handles: model client,
/// tool registry, event bus, turn runner. A missing API key is an
/// unrecoverable startup failure with setup instructions.
pub(crate) fn setup() -> Result<(TurnRunner, Arc<EventBus>), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if config.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GEMINI_API_KEY=...    (recommended)");
        eprintln!("    GOOGLE_API_KEY=...");
        eprintln!("    RUMMAGE_API_KEY=...");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        eprintln!("  Get a key at: https://aistudio.google.com/apikey");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let client = Arc::new(GeminiClient::from_config(&config)?);
    let tools = Arc::new(rummage_tools::default_registry(&config));
    let events = Arc::new(EventBus::default());
    let runner = TurnRunner::from_config(client, tools, events.clone(), &config);

    Ok((runner, events))
}
