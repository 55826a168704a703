//! Command catalog and its synchronization with Discord.

use log::{debug, info, warn};
use poise::{
    builtins,
    serenity_prelude::{self as serenity, CreateCommand},
};

use crate::bot::Data;
use crate::commands::{ask_ai, ask_lookup};
use crate::config::BotMode;
use crate::error::BotError;

pub type Command = poise::Command<Data, BotError>;

/// Commands exposed by the bot, unique by name.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the `/ask` variant for `mode`.
    #[must_use]
    pub fn for_mode(mode: BotMode) -> Self {
        let mut registry = Self::new();
        match mode {
            BotMode::Completion => registry.register(ask_ai()),
            BotMode::Lookup => registry.register(ask_lookup()),
        };
        registry
    }

    /// Add a command. A command with the same name is replaced.
    pub fn register(&mut self, command: Command) -> &mut Self {
        match self.commands.iter_mut().find(|c| c.name == command.name) {
            Some(existing) => {
                debug!("Replacing command '{}'", command.name);
                *existing = command;
            }
            None => {
                debug!("Registering command '{}'", command.name);
                self.commands.push(command);
            }
        }
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

/// Push the catalog to Discord in the background.
///
/// Runs once on ready. A failed sync is logged and the bot stays connected.
pub fn spawn_sync(ctx: &serenity::Context, commands: &[Command]) {
    let create_commands = builtins::create_application_commands(commands);
    let ctx = ctx.clone();
    tokio::spawn(async move { sync_commands(&ctx, create_commands).await });
}

async fn sync_commands(ctx: &serenity::Context, commands: Vec<CreateCommand>) {
    debug!("Synchronizing {} command(s) globally", commands.len());
    match serenity::Command::set_global_commands(ctx, commands).await {
        Ok(registered) => info!("Synchronized {} command(s) with Discord", registered.len()),
        Err(e) => warn!("Failed to synchronize commands, they may not appear yet: {e}"),
    }
}
