//! Thought entity and input validation.
//!
//! [`Thought`] is the listing-safe view of a persisted record: it never
//! carries the edit token or the owner token. [`ThoughtDraft`] is a fully
//! validated creation payload; constructing one performs all trimming and
//! length checks before any storage is touched.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::Error;

/// Trimmed length bounds for the display label.
pub const USERNAME_MAX: usize = 50;
/// Trimmed length bounds for the body text.
pub const TEXT_MAX: usize = 500;
/// Owner tokens shorter than this are too guessable to act as an identity.
pub const OWNER_TOKEN_MIN: usize = 8;
/// Upper bound keeps the claim-table index bounded.
pub const OWNER_TOKEN_MAX: usize = 200;

/// A persisted thought, as exposed to listings and mutation responses.
#[derive(Debug, Clone, PartialEq)]
pub struct Thought {
    /// Monotonically assigned identity; immutable.
    pub id: i64,
    /// Display label of the author; not an identity.
    pub username: String,
    /// Body content.
    pub text: String,
    /// Set once at insertion; defines listing order and the day key.
    pub created_at: DateTime<Utc>,
    /// `None` until the first edit; set on every subsequent edit.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A validated creation payload: trimmed, length-checked, storage ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThoughtDraft {
    username: String,
    text: String,
    owner_token: String,
}

fn field_error(message: &str, field: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field }))
}

/// Trim and validate a display name.
pub fn validate_username(raw: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(field_error("Username cannot be empty.", "username"));
    }
    if trimmed.chars().count() > USERNAME_MAX {
        return Err(field_error(
            "Username must be at most 50 characters.",
            "username",
        ));
    }
    Ok(trimmed.to_owned())
}

/// Trim and validate thought body text. Shared by create and update.
pub fn validate_text(raw: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(field_error("Thought text cannot be empty.", "text"));
    }
    if trimmed.chars().count() > TEXT_MAX {
        return Err(field_error(
            "Thought text must be at most 500 characters.",
            "text",
        ));
    }
    Ok(trimmed.to_owned())
}

/// Trim and validate the anonymous owner token.
pub fn validate_owner_token(raw: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(field_error("Token is required.", "ownerToken"));
    }
    let length = trimmed.chars().count();
    if !(OWNER_TOKEN_MIN..=OWNER_TOKEN_MAX).contains(&length) {
        return Err(field_error(
            "Token length must be between 8 and 200 characters.",
            "ownerToken",
        ));
    }
    Ok(trimmed.to_owned())
}

impl ThoughtDraft {
    /// Validate raw creation inputs into a draft.
    ///
    /// Violations return [`Error::invalid_request`] with `details.field`
    /// naming the offending field; nothing is written on failure.
    pub fn new(username: &str, text: &str, owner_token: &str) -> Result<Self, Error> {
        Ok(Self {
            username: validate_username(username)?,
            text: validate_text(text)?,
            owner_token: validate_owner_token(owner_token)?,
        })
    }

    /// Trimmed display name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Trimmed body text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Trimmed anonymous owner token.
    pub fn owner_token(&self) -> &str {
        &self.owner_token
    }
}
