use teloxide::types::{ChatId, MessageId};

use super::RegistryError;

/// Where a quiz poll currently lives after being launched into a group.
/// Kept so the owner can manage (e.g. close) the running poll later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub chat: ChatId,
    pub message: MessageId,
}

/// One stored quiz. The content fields never change after creation;
/// `token` and `destination` are rewritten each time the quiz is
/// republished into a new chat.
#[derive(Debug, Clone)]
pub struct QuizRecord {
    token: String,
    question: String,
    options: Vec<String>,
    correct_option: u8,
    owner: String,
    destination: Option<Destination>,
}

impl QuizRecord {
    pub fn new(
        owner: String,
        question: String,
        options: Vec<String>,
        correct_option: u8,
        token: String,
    ) -> Result<Self, RegistryError> {
        if options.len() < 2 {
            return Err(RegistryError::InvalidContent(
                "a quiz needs at least two options".into(),
            ));
        }
        if usize::from(correct_option) >= options.len() {
            return Err(RegistryError::InvalidContent(format!(
                "correct option {} is out of range for {} options",
                correct_option,
                options.len()
            )));
        }

        Ok(Self {
            token,
            question,
            options,
            correct_option,
            owner,
            destination: None,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_option(&self) -> u8 {
        self.correct_option
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn destination(&self) -> Option<Destination> {
        self.destination
    }

    /// Rebinds this record to the poll instance minted by a republication.
    pub(crate) fn redistribute(&mut self, token: String, destination: Destination) {
        self.token = token;
        self.destination = Some(destination);
    }
}
