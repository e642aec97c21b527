use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters, prelude::Requester, types::Message, types::ReplyMarkup,
    utils::command::BotCommands, Bot,
};
use tracing::instrument;

use crate::{
    keyboard, links,
    publish::Publish,
    registry::{Registry, RegistryError},
    HandlerResult,
};

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "display help.")]
    Help,
    #[command(description = "cancel the current action.")]
    Cancel,
    #[command(description = "start the bot, or launch a shared quiz in a group.")]
    Start(String),
    #[command(description = "list your saved quizzes as shareable links.")]
    Links,
}

pub async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

pub async fn cancel(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "Action cancelled. Send /start to begin again.")
        .reply_markup(ReplyMarkup::kb_remove())
        .await?;
    Ok(())
}

/// `/start` in a private chat opens the authoring flow; in a group it either
/// nudges the user into the private chat (no payload) or launches the quiz
/// whose token rode in on the deep link.
#[instrument(level = "info", skip(registry, publisher))]
pub async fn start<P: Publish>(
    bot: Bot,
    msg: Message,
    payload: String,
    registry: Arc<Registry>,
    publisher: Arc<P>,
) -> HandlerResult {
    if msg.chat.is_private() {
        bot.send_message(
            msg.chat.id,
            "Press the button below and create a quiz! \
             Heads up: once shared it will be public (non-anonymous).",
        )
        .reply_markup(keyboard::authoring_keyboard())
        .await?;
        return Ok(());
    }

    if payload.is_empty() {
        // Bare /start in a group: nothing selected, send the user to the
        // private chat to author a quiz.
        let me = bot.get_me().await?;
        let link = links::private_chat_link(me.username())?;
        bot.send_message(
            msg.chat.id,
            "No quiz selected. Please open the private chat with me to create a new one.",
        )
        .reply_markup(keyboard::private_chat_keyboard(link))
        .await?;
        return Ok(());
    }

    match registry
        .activate(&payload, publisher.as_ref(), msg.chat.id)
        .await
    {
        Ok(record) => {
            log::info!(
                "quiz '{}' launched into chat {}",
                record.question(),
                msg.chat.id
            );
        }
        Err(RegistryError::UnknownToken(_)) => {
            bot.send_message(
                msg.chat.id,
                "This quiz was deleted, is no longer valid or has already been launched \
                 in another group. Try creating a new one.",
            )
            .await?;
        }
        Err(RegistryError::PublishFailed(e)) => {
            log::error!("publishing quiz for token {payload} failed: {e}");
            bot.send_message(msg.chat.id, "I couldn't publish the quiz. Please try again.")
                .await?;
        }
        Err(e) => {
            log::error!("activating token {payload} failed: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

/// The owner's quizzes as an inline keyboard of startgroup deep links.
#[instrument(level = "info", skip(registry))]
pub async fn list_links(bot: Bot, msg: Message, registry: Arc<Registry>) -> HandlerResult {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let records = registry.list_for_owner(&user.id.to_string()).await;
    if records.is_empty() {
        bot.send_message(msg.chat.id, "You have no saved quizzes yet.")
            .await?;
        return Ok(());
    }

    let me = bot.get_me().await?;
    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        rows.push((
            record.question().to_owned(),
            links::startgroup_link(me.username(), record.token())?,
        ));
    }

    bot.send_message(msg.chat.id, "Your quizzes:")
        .reply_markup(keyboard::quiz_links_keyboard(&rows))
        .await?;

    Ok(())
}
