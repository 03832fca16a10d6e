//! Thought use-case implementations.
//!
//! [`ThoughtService`] implements the driving ports over a
//! [`ThoughtRepository`] and a clock. Validation happens before any storage
//! access; the creation timestamp and its day key come from a single clock
//! read so the duplicate check and the stored row can never disagree about
//! the day boundary.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CreateThoughtRequest, CreatedThought, DeleteThoughtRequest, NewThought, StoredCredential,
    ThoughtRepository, ThoughtRepositoryError, ThoughtsCommand, ThoughtsQuery,
    UpdateThoughtRequest,
};
use crate::domain::{DayKey, EditToken, Error, Thought, ThoughtDraft, validate_text};

/// Message returned when the daily slot is already claimed. Mirrors the
/// product copy shown to end users.
const DUPLICATE_MESSAGE: &str =
    "This token has already submitted a thought today (UTC). Try again tomorrow.";

/// Domain service implementing [`ThoughtsCommand`] and [`ThoughtsQuery`].
#[derive(Clone)]
pub struct ThoughtService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ThoughtService<R> {
    /// Create a service over the given repository and clock.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

fn map_repository_error(error: ThoughtRepositoryError) -> Error {
    match error {
        ThoughtRepositoryError::Unavailable { message } => {
            debug!(%message, "thought repository unavailable");
            Error::storage_unavailable("Storage is unavailable. Try again later.")
        }
        ThoughtRepositoryError::Query { message } => {
            debug!(%message, "thought repository query failed");
            Error::internal("Internal server error")
        }
        ThoughtRepositoryError::DuplicateDay { .. } => Error::duplicate_submission(DUPLICATE_MESSAGE),
        ThoughtRepositoryError::NotFound { .. } => Error::not_found("Thought not found."),
    }
}

/// Check a presented credential against the stored one.
///
/// Generation-1 rows carry no stored token and are permanently read-only, so
/// they fail authorisation like any mismatch.
fn authorize(credential: &StoredCredential, presented: &str) -> Result<(), Error> {
    let stored = credential
        .edit_token
        .as_deref()
        .map(EditToken::from_stored);
    match stored {
        Some(token) if token.matches(presented) => Ok(()),
        _ => Err(Error::forbidden("Invalid edit token.")),
    }
}

fn require_presented_token(presented: &str) -> Result<&str, Error> {
    let trimmed = presented.trim();
    if trimmed.is_empty() {
        return Err(Error::forbidden("Missing edit token."));
    }
    Ok(trimmed)
}

impl<R> ThoughtService<R>
where
    R: ThoughtRepository,
{
    async fn load_credential(&self, id: i64) -> Result<StoredCredential, Error> {
        self.repository
            .find_credential(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Thought not found."))
    }
}

#[async_trait]
impl<R> ThoughtsCommand for ThoughtService<R>
where
    R: ThoughtRepository,
{
    async fn create(&self, request: CreateThoughtRequest) -> Result<CreatedThought, Error> {
        let draft = ThoughtDraft::new(&request.username, &request.text, &request.owner_token)?;
        let edit_token = EditToken::mint();

        // One clock read feeds both the row timestamp and the claimed slot.
        let created_at = self.clock.utc();
        let day_key = DayKey::from_timestamp(created_at);

        let thought = self
            .repository
            .insert_with_claim(NewThought {
                username: draft.username().to_owned(),
                text: draft.text().to_owned(),
                owner_token: draft.owner_token().to_owned(),
                edit_token: edit_token.as_str().to_owned(),
                created_at,
                day_key,
            })
            .await
            .map_err(map_repository_error)?;

        info!(id = thought.id, "thought created");
        Ok(CreatedThought {
            thought,
            edit_token,
        })
    }

    async fn update(&self, request: UpdateThoughtRequest) -> Result<Thought, Error> {
        let presented = require_presented_token(&request.edit_token)?;
        let new_text = validate_text(&request.text)?;

        let credential = self.load_credential(request.id).await?;
        authorize(&credential, presented)?;

        let updated = self
            .repository
            .update_text(request.id, new_text, self.clock.utc())
            .await
            .map_err(map_repository_error)?;

        info!(id = updated.id, "thought updated");
        Ok(updated)
    }

    async fn delete(&self, request: DeleteThoughtRequest) -> Result<(), Error> {
        let presented = require_presented_token(&request.edit_token)?;

        let credential = self.load_credential(request.id).await?;
        authorize(&credential, presented)?;

        self.repository
            .delete_with_claim(request.id)
            .await
            .map_err(map_repository_error)?;

        info!(id = request.id, "thought deleted");
        Ok(())
    }

    async fn clear_all(&self) -> Result<u64, Error> {
        let removed = self
            .repository
            .delete_all()
            .await
            .map_err(map_repository_error)?;
        info!(removed, "all thoughts cleared");
        Ok(removed)
    }
}

#[async_trait]
impl<R> ThoughtsQuery for ThoughtService<R>
where
    R: ThoughtRepository,
{
    async fn list(&self) -> Result<Vec<Thought>, Error> {
        self.repository
            .list_chronological()
            .await
            .map_err(map_repository_error)
    }
}
