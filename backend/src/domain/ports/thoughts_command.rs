//! Driving port for thought mutations.
//!
//! HTTP handlers depend on this trait, not on the concrete service, so they
//! stay testable without storage.

use async_trait::async_trait;

use crate::domain::{EditToken, Error, Thought};

/// Raw creation inputs as received from the transport, untrimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateThoughtRequest {
    /// Display name of the author.
    pub username: String,
    /// Body text of the thought.
    pub text: String,
    /// Anonymous client token enforcing the daily limit.
    pub owner_token: String,
}

/// A freshly created thought together with its one-time-visible credential.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedThought {
    /// The persisted record.
    pub thought: Thought,
    /// The minted capability; this is the only place it is ever exposed.
    pub edit_token: EditToken,
}

/// Raw edit inputs as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateThoughtRequest {
    /// Target thought id.
    pub id: i64,
    /// Presented edit credential.
    pub edit_token: String,
    /// Replacement body text.
    pub text: String,
}

/// Raw delete inputs as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteThoughtRequest {
    /// Target thought id.
    pub id: i64,
    /// Presented edit credential.
    pub edit_token: String,
}

/// Use-cases that mutate thoughts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThoughtsCommand: Send + Sync {
    /// Create a thought, enforcing validation and the daily limit.
    async fn create(&self, request: CreateThoughtRequest) -> Result<CreatedThought, Error>;

    /// Replace a thought's text, authorised by its edit token.
    async fn update(&self, request: UpdateThoughtRequest) -> Result<Thought, Error>;

    /// Delete a thought, authorised by its edit token. Frees the daily slot.
    async fn delete(&self, request: DeleteThoughtRequest) -> Result<(), Error>;

    /// Maintenance: remove every thought. Returns the number removed.
    ///
    /// Callers are trusted; reachability gating (the operator flag) is the
    /// responsibility of the adapter exposing this operation.
    async fn clear_all(&self) -> Result<u64, Error>;
}
