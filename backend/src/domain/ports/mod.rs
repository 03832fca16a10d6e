//! Domain ports.
//!
//! Driving ports ([`ThoughtsCommand`], [`ThoughtsQuery`]) are consumed by
//! inbound adapters; the driven port ([`ThoughtRepository`]) is implemented
//! by persistence adapters.

mod thought_repository;
mod thoughts_command;
mod thoughts_query;

pub use thought_repository::{
    NewThought, StoredCredential, ThoughtRepository, ThoughtRepositoryError,
};
pub use thoughts_command::{
    CreateThoughtRequest, CreatedThought, DeleteThoughtRequest, ThoughtsCommand,
    UpdateThoughtRequest,
};
pub use thoughts_query::ThoughtsQuery;

#[cfg(test)]
pub use thought_repository::MockThoughtRepository;
#[cfg(test)]
pub use thoughts_command::MockThoughtsCommand;
#[cfg(test)]
pub use thoughts_query::MockThoughtsQuery;
