//! Diesel row structs for the persistence layer.
//!
//! Internal to the adapter: the domain only ever sees [`Thought`] values.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::Thought;
use crate::domain::ports::NewThought;

use super::schema::{daily_claims, thoughts};

/// Full thought row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = thoughts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ThoughtRow {
    pub id: i64,
    pub username: String,
    pub thought_text: String,
    pub created_at: NaiveDateTime,
    pub edit_token: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
    pub owner_token: Option<String>,
}

impl ThoughtRow {
    /// Convert to the token-free domain entity. Stored timestamps are naive
    /// UTC by convention.
    pub fn into_thought(self) -> Thought {
        Thought {
            id: self.id,
            username: self.username,
            text: self.thought_text,
            created_at: as_utc(self.created_at),
            updated_at: self.updated_at.map(as_utc),
        }
    }
}

fn as_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

/// Insertable thought row. `id` is assigned by the engine; `updated_at`
/// starts NULL.
#[derive(Debug, Insertable)]
#[diesel(table_name = thoughts)]
pub struct NewThoughtRow<'a> {
    pub username: &'a str,
    pub thought_text: &'a str,
    pub created_at: NaiveDateTime,
    pub edit_token: &'a str,
    pub owner_token: &'a str,
}

impl<'a> NewThoughtRow<'a> {
    /// Build the insertable row from a validated creation record.
    pub fn from_new_thought(new_thought: &'a NewThought) -> Self {
        Self {
            username: &new_thought.username,
            thought_text: &new_thought.text,
            created_at: new_thought.created_at.naive_utc(),
            edit_token: &new_thought.edit_token,
            owner_token: &new_thought.owner_token,
        }
    }
}

/// Insertable daily-claim row.
#[derive(Debug, Insertable)]
#[diesel(table_name = daily_claims)]
pub struct NewClaimRow<'a> {
    pub thought_id: i64,
    pub owner_token: &'a str,
    pub day_key: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn row_conversion_marks_timestamps_utc() {
        let naive = NaiveDateTime::parse_from_str("2024-06-15 08:30:00", "%Y-%m-%d %H:%M:%S")
            .expect("parse timestamp");
        let row = ThoughtRow {
            id: 1,
            username: "alice".to_owned(),
            thought_text: "hi".to_owned(),
            created_at: naive,
            edit_token: Some("secret".to_owned()),
            updated_at: None,
            owner_token: Some("tttttttt12".to_owned()),
        };

        let thought = row.into_thought();
        assert_eq!(thought.created_at.naive_utc(), naive);
        assert_eq!(thought.updated_at, None);
        assert_eq!(thought.text, "hi");
    }
}
