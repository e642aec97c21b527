//! Registration flow: a quiz-mode poll sent to the bot in a private chat
//! becomes a stored, shareable quiz.

use std::sync::Arc;

use teloxide::{prelude::Requester, types::Message, Bot};
use tracing::instrument;

use crate::{
    registry::{QuizRecord, Registry, RegistryError},
    HandlerResult,
};

#[instrument(level = "info", skip(registry))]
pub async fn receive_quiz(bot: Bot, msg: Message, registry: Arc<Registry>) -> HandlerResult {
    let Some(poll) = msg.poll() else {
        return Ok(());
    };
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    // Regular polls carry no correct option; only quiz-mode polls do.
    let Some(correct) = poll.correct_option_id else {
        bot.send_message(msg.chat.id, "Sorry, I only accept quiz-mode polls!")
            .await?;
        return Ok(());
    };

    let options = poll.options.iter().map(|o| o.text.clone()).collect();
    let record = QuizRecord::new(
        user.id.to_string(),
        poll.question.clone(),
        options,
        correct,
        poll.id.to_string(),
    );

    match record {
        Ok(record) => match registry.register(record).await {
            Ok(count) => {
                log::info!("user {} saved a quiz, {count} stored in total", user.id);
                bot.send_message(
                    msg.chat.id,
                    format!(
                        "Quiz saved. Total saved quizzes: {count}. \
                         Mention me in any chat to share them."
                    ),
                )
                .await?;
            }
            Err(RegistryError::DuplicateToken(token)) => {
                log::error!("user {} resubmitted already registered poll {token}", user.id);
                bot.send_message(msg.chat.id, "This quiz is already saved.")
                    .await?;
            }
            Err(e) => return Err(e.into()),
        },
        Err(RegistryError::InvalidContent(reason)) => {
            bot.send_message(msg.chat.id, format!("I can't save that quiz: {reason}."))
                .await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
