//! Discord bot setup and framework wiring.

use log::{debug, error, info, warn};
use poise::{
    CreateReply, Framework, FrameworkError, FrameworkOptions, builtins,
    serenity_prelude::{ClientBuilder, GatewayIntents},
};

use crate::answers::AnswerTable;
use crate::completion::CompletionClient;
use crate::config::{BotMode, Config};
use crate::error::{BotError, Result};
use crate::registrar::{CommandRegistry, spawn_sync};

pub type Context<'a> = poise::Context<'a, Data, BotError>;

/// Answer source for the active mode.
pub enum Resolver {
    Lookup(AnswerTable),
    Completion(CompletionClient),
}

pub struct Data {
    resolver: Resolver,
}

impl Data {
    #[must_use]
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    #[must_use]
    pub fn mode(&self) -> BotMode {
        match self.resolver {
            Resolver::Lookup(_) => BotMode::Lookup,
            Resolver::Completion(_) => BotMode::Completion,
        }
    }

    pub fn answer_table(&self) -> Result<&AnswerTable> {
        match &self.resolver {
            Resolver::Lookup(table) => Ok(table),
            Resolver::Completion(_) => Err(BotError::ModeMismatch(self.mode())),
        }
    }

    pub fn completion_client(&self) -> Result<&CompletionClient> {
        match &self.resolver {
            Resolver::Completion(client) => Ok(client),
            Resolver::Lookup(_) => Err(BotError::ModeMismatch(self.mode())),
        }
    }
}

fn build_resolver(config: &Config) -> Result<Resolver> {
    match (config.mode, &config.completion) {
        (BotMode::Lookup, _) => Ok(Resolver::Lookup(AnswerTable::builtin()?)),
        (BotMode::Completion, Some(completion)) => Ok(Resolver::Completion(
            CompletionClient::new(completion.api_key.clone(), completion.base_url.clone()),
        )),
        (BotMode::Completion, None) => Err(BotError::Config(
            "Completion settings are required in ai mode".to_string(),
        )),
    }
}

/// Run the Discord bot.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    debug!("Building {} resolver", config.mode);
    let resolver = build_resolver(&config)?;
    let registry = CommandRegistry::for_mode(config.mode);

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: registry.into_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}!", ready.user.name);
                spawn_sync(ctx, &framework.options().commands);
                Ok(Data::new(resolver))
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(config.discord_token, GatewayIntents::non_privileged())
        .framework(framework)
        .await?;

    info!("Starting Discord client in {} mode", config.mode);

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

async fn on_error(error: FrameworkError<'_, Data, BotError>) {
    match error {
        FrameworkError::Setup { error, .. } => {
            error!("Failed to set up bot: {error}");
        }
        FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Error in command '/{}' from {}: {}",
                ctx.command().name,
                ctx.author().tag(),
                error
            );
            let reply = CreateReply::default()
                .content(error.user_message())
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                warn!("Failed to deliver error message: {e}");
            }
        }
        other => {
            if let Err(e) = builtins::on_error(other).await {
                error!("Error while handling framework error: {e}");
            }
        }
    }
}
