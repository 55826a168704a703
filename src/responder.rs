//! Interaction lifecycle: acknowledge, optionally prompt, then answer.
//!
//! `Interaction` -> `Deferred` -> `Answered` for slow answers,
//! `Interaction` -> `PendingSelection` -> `Answered` for select menus, or
//! `Interaction` -> `Answered` for immediate replies. A follow-up can only be
//! sent through a [`Deferred`], which only [`Interaction::defer`] produces.

use std::future::Future;
use std::time::Duration;

use log::{debug, info};
use poise::{
    CreateReply, ReplyHandle,
    serenity_prelude::{
        ComponentInteraction, ComponentInteractionCollector, ComponentInteractionDataKind,
        CreateActionRow, CreateInteractionResponse, CreateInteractionResponseMessage,
        CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption,
    },
};

use crate::bot::Context;
use crate::error::Result;

/// Discord's maximum message content length in characters.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// How long a selection prompt waits for the invoker.
pub const PROMPT_TIMEOUT: Duration = Duration::from_secs(120);

const PROMPT_TIMEOUT_TEXT: &str = "No question selected. Run `/ask` again to pick one.";

/// Raw reply operations for one invocation.
///
/// Used through [`Interaction`], which enforces the ordering between them.
pub trait ReplyChannel: Send + Sync {
    type Selection: SelectionReply;

    /// Acknowledge with a visible "thinking" placeholder.
    fn defer(&self) -> impl Future<Output = Result<()>> + Send;

    fn reply(&self, text: &str, ephemeral: bool) -> impl Future<Output = Result<()>> + Send;

    /// Deliver a message after [`ReplyChannel::defer`].
    fn follow_up(&self, text: &str) -> impl Future<Output = Result<()>> + Send;

    /// Show a select menu to the invoker and wait for a choice.
    ///
    /// Resolves to `None` when the invoker does not choose in time.
    fn prompt(
        &self,
        prompt: &SelectionPrompt,
    ) -> impl Future<Output = Result<Option<Self::Selection>>> + Send;
}

/// The invoker's choice from a select menu, answerable exactly once.
pub trait SelectionReply: Send {
    fn label(&self) -> &str;

    fn answer(self, text: &str, ephemeral: bool) -> impl Future<Output = Result<()>> + Send;
}

/// Select menu contents shown to the invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPrompt {
    heading: String,
    placeholder: String,
    options: Vec<String>,
}

impl SelectionPrompt {
    pub fn new<I, S>(heading: &str, placeholder: &str, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            heading: heading.to_string(),
            placeholder: placeholder.to_string(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn heading(&self) -> &str {
        &self.heading
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

/// Proof that an interaction received its final answer.
#[must_use]
#[derive(Debug)]
pub struct Answered {
    _private: (),
}

impl Answered {
    fn new() -> Self {
        Self { _private: () }
    }
}

/// A freshly received invocation that has not been acknowledged.
pub struct Interaction<C> {
    channel: C,
}

impl<C: ReplyChannel> Interaction<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Reply right away with the final text.
    pub async fn answer_now(self, text: &str, ephemeral: bool) -> Result<Answered> {
        self.channel.reply(clamp_message(text), ephemeral).await?;
        Ok(Answered::new())
    }

    /// Acknowledge now and deliver the answer later.
    pub async fn defer(self) -> Result<Deferred<C>> {
        self.channel.defer().await?;
        debug!("Interaction deferred");
        Ok(Deferred {
            channel: self.channel,
        })
    }

    /// Show a select menu; the prompt itself is the acknowledgment.
    pub async fn prompt(
        self,
        prompt: SelectionPrompt,
    ) -> Result<Option<PendingSelection<C::Selection>>> {
        match self.channel.prompt(&prompt).await? {
            Some(selection) => {
                debug!("Invoker selected '{}'", selection.label());
                Ok(Some(PendingSelection { selection }))
            }
            None => {
                info!("Selection prompt timed out");
                Ok(None)
            }
        }
    }
}

/// An acknowledged interaction awaiting its follow-up.
pub struct Deferred<C> {
    channel: C,
}

impl<C: ReplyChannel> Deferred<C> {
    pub async fn follow_up(self, text: &str) -> Result<Answered> {
        self.channel.follow_up(clamp_message(text)).await?;
        Ok(Answered::new())
    }
}

/// A selection made by the invoker, not yet answered.
pub struct PendingSelection<S> {
    selection: S,
}

impl<S: SelectionReply> PendingSelection<S> {
    #[must_use]
    pub fn label(&self) -> &str {
        self.selection.label()
    }

    pub async fn answer(self, text: &str) -> Result<Answered> {
        self.selection.answer(clamp_message(text), true).await?;
        Ok(Answered::new())
    }
}

/// Cut text to Discord's message limit on a character boundary.
#[must_use]
pub fn clamp_message(text: &str) -> &str {
    match text.char_indices().nth(MAX_MESSAGE_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// [`ReplyChannel`] backed by a poise slash command context.
pub struct PoiseChannel<'a> {
    ctx: Context<'a>,
}

impl<'a> PoiseChannel<'a> {
    #[must_use]
    pub fn new(ctx: Context<'a>) -> Self {
        Self { ctx }
    }
}

impl<'a> ReplyChannel for PoiseChannel<'a> {
    type Selection = PoiseSelection<'a>;

    async fn defer(&self) -> Result<()> {
        self.ctx.defer().await?;
        Ok(())
    }

    async fn reply(&self, text: &str, ephemeral: bool) -> Result<()> {
        let reply = CreateReply::default().content(text).ephemeral(ephemeral);
        self.ctx.send(reply).await?;
        Ok(())
    }

    async fn follow_up(&self, text: &str) -> Result<()> {
        self.ctx.say(text).await?;
        Ok(())
    }

    async fn prompt(&self, prompt: &SelectionPrompt) -> Result<Option<PoiseSelection<'a>>> {
        let custom_id = format!("ask-select-{}", self.ctx.id());
        let options = prompt
            .options()
            .iter()
            .map(|label| CreateSelectMenuOption::new(label, label))
            .collect();
        let menu = CreateSelectMenu::new(&custom_id, CreateSelectMenuKind::String { options })
            .placeholder(prompt.placeholder());
        let reply = CreateReply::default()
            .content(prompt.heading())
            .ephemeral(true)
            .components(vec![CreateActionRow::SelectMenu(menu)]);
        let handle = self.ctx.send(reply).await?;

        let collected = ComponentInteractionCollector::new(self.ctx.serenity_context())
            .author_id(self.ctx.author().id)
            .channel_id(self.ctx.channel_id())
            .timeout(PROMPT_TIMEOUT)
            .filter(move |mci| mci.data.custom_id == custom_id)
            .await;

        let Some(interaction) = collected else {
            let cleared = CreateReply::default()
                .content(PROMPT_TIMEOUT_TEXT)
                .components(Vec::new());
            handle.edit(self.ctx, cleared).await?;
            return Ok(None);
        };

        let label = match &interaction.data.kind {
            ComponentInteractionDataKind::StringSelect { values } => {
                values.first().cloned().unwrap_or_default()
            }
            _ => String::new(),
        };

        Ok(Some(PoiseSelection {
            ctx: self.ctx,
            handle,
            interaction,
            label,
        }))
    }
}

pub struct PoiseSelection<'a> {
    ctx: Context<'a>,
    handle: ReplyHandle<'a>,
    interaction: ComponentInteraction,
    label: String,
}

/// Response to the invoker's pick.
///
/// Ephemeral answers replace the prompt, which is itself ephemeral, so its
/// select menu goes away with it. Public answers are posted as new messages.
fn selection_response(text: &str, ephemeral: bool) -> CreateInteractionResponse {
    if ephemeral {
        CreateInteractionResponse::UpdateMessage(
            CreateInteractionResponseMessage::new()
                .content(text)
                .components(Vec::new()),
        )
    } else {
        CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().content(text))
    }
}

impl SelectionReply for PoiseSelection<'_> {
    fn label(&self) -> &str {
        &self.label
    }

    async fn answer(self, text: &str, ephemeral: bool) -> Result<()> {
        self.interaction
            .create_response(
                self.ctx.serenity_context(),
                selection_response(text, ephemeral),
            )
            .await?;

        if !ephemeral {
            let closed = CreateReply::default().components(Vec::new());
            self.handle.edit(self.ctx, closed).await?;
        }
        Ok(())
    }
}
