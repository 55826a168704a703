//! The `/ask` slash command in both of its variants.

use log::{debug, info};

use crate::answers::AnswerTable;
use crate::bot::Context;
use crate::completion::CompletionClient;
use crate::error::Result;
use crate::responder::{Answered, Interaction, PoiseChannel, ReplyChannel, SelectionPrompt};

pub const COMMAND_NAME: &str = "ask";

const PROMPT_HEADING: &str = "Which question would you like answered?";
const PROMPT_PLACEHOLDER: &str = "Choose a question";

/// Ask the AI a question.
#[poise::command(slash_command, rename = "ask")]
pub async fn ask_ai(
    ctx: Context<'_>,
    #[description = "What would you like to know?"] question: String,
) -> Result<()> {
    let client = ctx.data().completion_client()?;
    info!(
        "/{COMMAND_NAME} from {} in channel {}",
        ctx.author().tag(),
        ctx.channel_id()
    );

    let _answered =
        answer_with_completion(Interaction::new(PoiseChannel::new(ctx)), client, &question)
            .await?;
    info!("Answered /{COMMAND_NAME} for {}", ctx.author().tag());
    Ok(())
}

/// Pick a common question and get its answer.
#[poise::command(slash_command, rename = "ask")]
pub async fn ask_lookup(ctx: Context<'_>) -> Result<()> {
    let table = ctx.data().answer_table()?;
    info!(
        "/{COMMAND_NAME} from {} in channel {}",
        ctx.author().tag(),
        ctx.channel_id()
    );

    if answer_with_selection(Interaction::new(PoiseChannel::new(ctx)), table)
        .await?
        .is_some()
    {
        info!("Answered /{COMMAND_NAME} for {}", ctx.author().tag());
    }
    Ok(())
}

/// Defer, resolve the question through the completion service, follow up.
///
/// The follow-up always carries text: the answer or the fixed failure message.
pub async fn answer_with_completion<C: ReplyChannel>(
    interaction: Interaction<C>,
    client: &CompletionClient,
    question: &str,
) -> Result<Answered> {
    info!("Resolving question ({} characters)", question.chars().count());
    debug!("Question: {question}");

    let deferred = interaction.defer().await?;
    let answer = client.resolve_by_completion(question).await;
    deferred.follow_up(&answer).await
}

/// Prompt with every table label, then answer the chosen one ephemerally.
///
/// A table with a single question is answered right away without a menu.
/// Returns `None` when the invoker never picks a question.
pub async fn answer_with_selection<C: ReplyChannel>(
    interaction: Interaction<C>,
    table: &AnswerTable,
) -> Result<Option<Answered>> {
    let mut labels = table.labels();
    if let (Some(only), None) = (labels.next(), labels.next()) {
        let answer = table.resolve_by_selection(only);
        return interaction.answer_now(answer, true).await.map(Some);
    }

    let prompt = SelectionPrompt::new(PROMPT_HEADING, PROMPT_PLACEHOLDER, table.labels());
    let Some(selection) = interaction.prompt(prompt).await? else {
        return Ok(None);
    };

    let answer = table.resolve_by_selection(selection.label());
    selection.answer(answer).await.map(Some)
}
