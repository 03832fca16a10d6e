//! Driven port for thought persistence.
//!
//! Adapters implement [`ThoughtRepository`] to provide durable storage. The
//! contract bakes in the two consistency rules the domain cannot enforce
//! alone: a thought and its daily claim are written and removed atomically,
//! and the storage engine's uniqueness constraint over
//! (owner token, day key) is the final arbiter of the daily limit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DayKey, Thought};

/// Errors raised by thought repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThoughtRepositoryError {
    /// The storage engine is unreachable, timed out, or the pool is dry.
    #[error("thought repository unavailable: {message}")]
    Unavailable { message: String },

    /// A query or mutation failed during execution.
    #[error("thought repository query failed: {message}")]
    Query { message: String },

    /// The (owner token, day key) slot is already claimed.
    #[error("daily slot already claimed for {day_key}")]
    DuplicateDay { day_key: String },

    /// No thought exists with the given id.
    #[error("thought {id} not found")]
    NotFound { id: i64 },
}

impl ThoughtRepositoryError {
    /// Create an [`ThoughtRepositoryError::Unavailable`] error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a [`ThoughtRepositoryError::Query`] error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a [`ThoughtRepositoryError::DuplicateDay`] error.
    pub fn duplicate_day(day_key: impl Into<String>) -> Self {
        Self::DuplicateDay {
            day_key: day_key.into(),
        }
    }

    /// Create a [`ThoughtRepositoryError::NotFound`] error.
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }
}

/// Storage-ready creation record. All fields are already validated; the
/// timestamp and day key come from the same clock read.
#[derive(Debug, Clone, PartialEq)]
pub struct NewThought {
    /// Trimmed display name.
    pub username: String,
    /// Trimmed body text.
    pub text: String,
    /// Trimmed anonymous owner token.
    pub owner_token: String,
    /// Freshly minted edit credential, stored verbatim.
    pub edit_token: String,
    /// Insertion instant; becomes the row's immutable `created_at`.
    pub created_at: DateTime<Utc>,
    /// Day key derived from `created_at`, claiming the daily slot.
    pub day_key: DayKey,
}

/// The mutation credential stored alongside a thought.
///
/// Generation-1 rows predate edit tokens; for those `edit_token` is `None`
/// and every mutation attempt is rejected upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// Stored edit token, absent on generation-1 rows.
    pub edit_token: Option<String>,
}

/// Port for durable thought storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThoughtRepository: Send + Sync {
    /// Insert a thought and its daily claim in one transaction.
    ///
    /// The claim table's uniqueness constraint decides races: when the
    /// (owner token, day key) slot is taken, whether detected by the
    /// fast-path pre-check or by a constraint violation at insert time,
    /// the whole transaction rolls back and
    /// [`ThoughtRepositoryError::DuplicateDay`] is returned.
    async fn insert_with_claim(
        &self,
        new_thought: NewThought,
    ) -> Result<Thought, ThoughtRepositoryError>;

    /// All thoughts ordered by (`created_at` ascending, `id` ascending).
    async fn list_chronological(&self) -> Result<Vec<Thought>, ThoughtRepositoryError>;

    /// Fetch the stored credential for a thought, `None` when the id is
    /// absent.
    async fn find_credential(
        &self,
        id: i64,
    ) -> Result<Option<StoredCredential>, ThoughtRepositoryError>;

    /// Replace the body text and stamp `updated_at`. `created_at` and the
    /// daily claim are untouched.
    async fn update_text(
        &self,
        id: i64,
        new_text: String,
        updated_at: DateTime<Utc>,
    ) -> Result<Thought, ThoughtRepositoryError>;

    /// Remove a thought and its claim in one transaction, re-opening the
    /// (owner token, day key) slot.
    async fn delete_with_claim(&self, id: i64) -> Result<(), ThoughtRepositoryError>;

    /// Remove every thought and claim. Returns the number of thoughts
    /// removed. Maintenance only; gating happens at the adapter boundary.
    async fn delete_all(&self) -> Result<u64, ThoughtRepositoryError>;
}
