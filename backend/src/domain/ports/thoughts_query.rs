//! Driving port for thought reads.

use async_trait::async_trait;

use crate::domain::{Error, Thought};

/// Read-only use-cases over thoughts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThoughtsQuery: Send + Sync {
    /// Every thought, oldest first: ordered by (`created_at` ascending,
    /// `id` ascending). A finite materialised snapshot, free of tokens.
    async fn list(&self) -> Result<Vec<Thought>, Error>;
}
