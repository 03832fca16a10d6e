//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they depend only on
//! the domain's driving ports and stay testable without storage.

use std::sync::Arc;

use crate::domain::ports::{ThoughtsCommand, ThoughtsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Mutating use-cases: create, update, delete, maintenance clear.
    pub thoughts: Arc<dyn ThoughtsCommand>,
    /// Read-only use-cases: chronological listing.
    pub thoughts_query: Arc<dyn ThoughtsQuery>,
}

impl HttpState {
    /// Bundle the port implementations handlers need.
    pub fn new(thoughts: Arc<dyn ThoughtsCommand>, thoughts_query: Arc<dyn ThoughtsQuery>) -> Self {
        Self {
            thoughts,
            thoughts_query,
        }
    }
}
