//! The publish collaborator: re-emits a stored quiz into a destination chat
//! and reports the identifiers Telegram minted for the new poll instance.

use std::time::Duration;

use teloxide::{
    payloads::SendPollSetters,
    prelude::Requester,
    types::{ChatId, MessageId, PollType},
    Bot, RequestError,
};
use thiserror::Error;

use crate::registry::QuizRecord;

/// Identifiers of a freshly published poll instance.
#[derive(Debug, Clone)]
pub struct PublishedQuiz {
    /// The new poll id; replaces the record's previous token.
    pub token: String,
    pub chat: ChatId,
    pub message: MessageId,
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("transport failure: {0}")]
    Transport(#[from] RequestError),

    #[error("publish did not complete within {0:?}")]
    Timeout(Duration),

    /// Telegram accepted the message but the response carries no poll,
    /// so no token can be extracted. Treated as a failed publish.
    #[error("published message carries no poll")]
    MissingPoll,
}

pub trait Publish {
    async fn publish(
        &self,
        quiz: &QuizRecord,
        destination: ChatId,
    ) -> Result<PublishedQuiz, PublishError>;
}

/// Sends the quiz as a non-anonymous quiz-mode poll via the bot API.
#[derive(Debug, Clone)]
pub struct TelegramPublisher {
    bot: Bot,
    timeout: Duration,
}

impl TelegramPublisher {
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(bot: Bot, timeout: Duration) -> Self {
        Self { bot, timeout }
    }
}

impl Publish for TelegramPublisher {
    async fn publish(
        &self,
        quiz: &QuizRecord,
        destination: ChatId,
    ) -> Result<PublishedQuiz, PublishError> {
        let request = self
            .bot
            .send_poll(
                destination,
                quiz.question().to_owned(),
                quiz.options().to_vec(),
            )
            .type_(PollType::Quiz)
            .is_anonymous(false)
            .correct_option_id(quiz.correct_option());

        let sent = tokio::time::timeout(self.timeout, async move { request.await })
            .await
            .map_err(|_| PublishError::Timeout(self.timeout))??;

        let poll = sent.poll().ok_or(PublishError::MissingPoll)?;
        log::info!(
            "republished quiz '{}' into chat {} as poll {}",
            quiz.question(),
            sent.chat.id,
            poll.id
        );

        Ok(PublishedQuiz {
            token: poll.id.to_string(),
            chat: sent.chat.id,
            message: sent.id,
        })
    }
}
