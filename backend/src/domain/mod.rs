//! Domain core: entities, validation, the day-key policy, and use-cases.
//!
//! Everything in this module is transport and storage agnostic. Inbound
//! adapters (HTTP) talk to the driving ports in [`ports`]; persistence
//! adapters implement the driven [`ports::ThoughtRepository`] port.

pub mod ports;

mod day_key;
mod edit_token;
mod error;
mod thought;
mod thought_service;

pub use self::day_key::DayKey;
pub use self::edit_token::EditToken;
pub use self::error::{Error, ErrorCode};
pub use self::thought::{
    OWNER_TOKEN_MAX, OWNER_TOKEN_MIN, TEXT_MAX, Thought, ThoughtDraft, USERNAME_MAX,
    validate_owner_token, validate_text, validate_username,
};
pub use self::thought_service::ThoughtService;

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
