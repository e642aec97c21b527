//! In-memory quiz registry: who owns which quiz, and under which token each
//! quiz is currently published.
//!
//! The registry owns both maps behind a single lock. Tokens are Telegram
//! poll ids, so every republication mints a new one and the old token has to
//! be re-keyed to the new identity.

mod error;
mod record;

pub use error::RegistryError;
pub use record::{Destination, QuizRecord};

use std::collections::HashMap;

use teloxide::types::ChatId;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::publish::Publish;

/// An owner's quizzes in registration order, with a token index so
/// lookup-by-token and re-keying stay O(1).
#[derive(Debug, Default)]
struct OwnerShelf {
    records: Vec<QuizRecord>,
    by_token: HashMap<String, usize>,
}

#[derive(Debug, Default)]
struct Maps {
    /// token -> owner id
    owners: HashMap<String, String>,
    /// owner id -> their quizzes
    quizzes: HashMap<String, OwnerShelf>,
}

#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<Maps>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly authored quiz under its owner and indexes its token.
    /// Returns how many quizzes the owner now has stored.
    pub async fn register(&self, record: QuizRecord) -> Result<usize, RegistryError> {
        let mut maps = self.inner.lock().await;

        if maps.owners.contains_key(record.token()) {
            return Err(RegistryError::DuplicateToken(record.token().to_owned()));
        }

        maps.owners
            .insert(record.token().to_owned(), record.owner().to_owned());
        let shelf = maps.quizzes.entry(record.owner().to_owned()).or_default();
        shelf
            .by_token
            .insert(record.token().to_owned(), shelf.records.len());
        shelf.records.push(record);

        Ok(shelf.records.len())
    }

    /// Launches the quiz behind `token` into `destination` and re-keys the
    /// record to the poll id the publication minted.
    ///
    /// The lock is held across the publish await on purpose: a racing
    /// activation on the same token must not resolve until the re-key below
    /// has happened, so exactly one of the racers succeeds and the rest see
    /// `UnknownToken`.
    #[instrument(level = "info", skip(self, publisher))]
    pub async fn activate<P: Publish>(
        &self,
        token: &str,
        publisher: &P,
        destination: ChatId,
    ) -> Result<QuizRecord, RegistryError> {
        let mut maps = self.inner.lock().await;

        let owner = maps
            .owners
            .get(token)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownToken(token.to_owned()))?;

        let slot = maps
            .quizzes
            .get(&owner)
            .and_then(|shelf| shelf.by_token.get(token).copied());
        let Some(slot) = slot else {
            log::error!("owner index maps '{token}' to '{owner}', but the store has no such quiz");
            return Err(RegistryError::StoreInconsistency {
                owner,
                token: token.to_owned(),
            });
        };

        let published = {
            let record = maps
                .quizzes
                .get(&owner)
                .and_then(|shelf| shelf.records.get(slot))
                .ok_or_else(|| RegistryError::StoreInconsistency {
                    owner: owner.clone(),
                    token: token.to_owned(),
                })?;
            publisher.publish(record, destination).await?
        };

        // Install the new key before removing the old one, so the quiz is
        // never absent from the owner index mid-rekey.
        maps.owners.insert(published.token.clone(), owner.clone());
        maps.owners.remove(token);

        let Some(shelf) = maps.quizzes.get_mut(&owner) else {
            return Err(RegistryError::StoreInconsistency {
                owner,
                token: token.to_owned(),
            });
        };
        shelf.by_token.remove(token);
        shelf.by_token.insert(published.token.clone(), slot);

        let record = &mut shelf.records[slot];
        record.redistribute(
            published.token,
            Destination {
                chat: published.chat,
                message: published.message,
            },
        );

        Ok(record.clone())
    }

    /// The owner's quizzes in registration order, with their current tokens.
    /// Empty (not an error) for owners who stored nothing yet.
    pub async fn list_for_owner(&self, owner: &str) -> Vec<QuizRecord> {
        let maps = self.inner.lock().await;
        maps.quizzes
            .get(owner)
            .map(|shelf| shelf.records.clone())
            .unwrap_or_default()
    }

    /// Resolves a token to the id of the user owning it.
    pub async fn owner_of(&self, token: &str) -> Option<String> {
        let maps = self.inner.lock().await;
        maps.owners.get(token).cloned()
    }
}
