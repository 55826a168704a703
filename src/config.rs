use std::env::{self, VarError};

use log::{debug, error, info};
use strum::{Display, EnumString};
use url::Url;

use crate::error::{BotError, Result};

const DEFAULT_AI_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Which `/ask` variant the bot exposes. Only one is active per process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum BotMode {
    /// Free-text questions answered by the completion service.
    #[default]
    #[strum(serialize = "ai")]
    Completion,
    /// Fixed questions answered from the static answer table.
    #[strum(serialize = "lookup")]
    Lookup,
}

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub base_url: Url,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub mode: BotMode,
    /// Present only in [`BotMode::Completion`].
    pub completion: Option<CompletionConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key))
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let discord_token = var("DISCORD_BOT_TOKEN").map_err(|e| {
            error!("Failed to load DISCORD_BOT_TOKEN from environment: {e}");
            e
        })?;
        if discord_token.trim().is_empty() {
            return Err(BotError::Config("DISCORD_BOT_TOKEN is empty".to_string()));
        }

        let mode = match optional(&var, "BOT_MODE")? {
            Some(raw) => raw
                .trim()
                .parse::<BotMode>()
                .map_err(|_| BotError::InvalidMode(raw.clone()))?,
            None => BotMode::default(),
        };

        let completion = match mode {
            BotMode::Lookup => None,
            BotMode::Completion => {
                let api_key = var("OPEN_ROUTER_API_KEY").map_err(|e| {
                    error!("Failed to load OPEN_ROUTER_API_KEY from environment: {e}");
                    e
                })?;
                let base_url = optional(&var, "AI_BASE_URL")?
                    .unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string());
                let base_url = Url::parse(&base_url).map_err(|e| {
                    error!("AI_BASE_URL '{base_url}' is not a valid URL: {e}");
                    e
                })?;
                Some(CompletionConfig { api_key, base_url })
            }
        };

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!("Bot mode: {mode}");
        if let Some(completion) = &completion {
            debug!(
                "Completion API key length: {} characters",
                completion.api_key.len()
            );
            debug!("Completion base URL: {}", completion.base_url);
        }

        Ok(Self {
            discord_token,
            mode,
            completion,
        })
    }
}

fn optional<F>(var: &F, key: &str) -> Result<Option<String>>
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    match var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
