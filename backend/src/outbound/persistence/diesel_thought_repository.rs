//! SQLite-backed [`ThoughtRepository`] implementation using Diesel.
//!
//! The adapter only translates between rows and domain types and enforces
//! the transactional pairing of thoughts and daily claims. The claim table's
//! `UNIQUE(owner_token, day_key)` constraint is the final arbiter of the
//! daily limit: the in-transaction pre-check merely produces a clean error
//! on the common path before a write is attempted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::Thought;
use crate::domain::ports::{
    NewThought, StoredCredential, ThoughtRepository, ThoughtRepositoryError,
};

use super::models::{NewClaimRow, NewThoughtRow, ThoughtRow};
use super::pool::{DbPool, PoolError};
use super::schema::{daily_claims, thoughts};

/// Diesel-backed implementation of the [`ThoughtRepository`] port.
#[derive(Clone)]
pub struct DieselThoughtRepository {
    pool: DbPool,
}

impl DieselThoughtRepository {
    /// Create a repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<PoolError> for ThoughtRepositoryError {
    fn from(error: PoolError) -> Self {
        Self::unavailable(error.to_string())
    }
}

/// Transaction-internal error carrier so `?` works on Diesel calls while the
/// duplicate pre-check can still short-circuit with a domain-shaped error.
#[derive(Debug)]
enum TxError {
    Repo(ThoughtRepositoryError),
    Diesel(DieselError),
}

impl From<DieselError> for TxError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

impl From<ThoughtRepositoryError> for TxError {
    fn from(error: ThoughtRepositoryError) -> Self {
        Self::Repo(error)
    }
}

/// Map Diesel failures outside any duplicate-sensitive context.
fn map_diesel_error(error: DieselError) -> ThoughtRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            if info.message().contains("database is locked") {
                return ThoughtRepositoryError::unavailable(info.message().to_owned());
            }
            ThoughtRepositoryError::query("database error")
        }
        _ => {
            debug!(error = %error, "diesel operation failed");
            ThoughtRepositoryError::query("database error")
        }
    }
}

/// Resolve a transaction error, translating a uniqueness violation on the
/// claim table into the duplicate-day error for the given slot.
fn resolve_tx_error(error: TxError, day_key: Option<&str>) -> ThoughtRepositoryError {
    match error {
        TxError::Repo(err) => err,
        TxError::Diesel(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)) => {
            match day_key {
                Some(key) => {
                    debug!(message = info.message(), day_key = key, "claim slot contested");
                    ThoughtRepositoryError::duplicate_day(key)
                }
                None => ThoughtRepositoryError::query("unexpected uniqueness violation"),
            }
        }
        TxError::Diesel(err) => map_diesel_error(err),
    }
}

#[async_trait]
impl ThoughtRepository for DieselThoughtRepository {
    async fn insert_with_claim(
        &self,
        new_thought: NewThought,
    ) -> Result<Thought, ThoughtRepositoryError> {
        self.pool
            .run(move |conn| {
                let day_key = new_thought.day_key.as_str().to_owned();

                // BEGIN IMMEDIATE takes the write lock up front so concurrent
                // claimants queue on the busy timeout instead of deadlocking
                // on a lock upgrade mid-transaction.
                let result = conn.immediate_transaction::<ThoughtRow, TxError, _>(|conn| {
                    // Fast path: surface a clean duplicate without writing.
                    let already_claimed: i64 = daily_claims::table
                        .filter(daily_claims::owner_token.eq(&new_thought.owner_token))
                        .filter(daily_claims::day_key.eq(&day_key))
                        .count()
                        .get_result(conn)?;
                    if already_claimed > 0 {
                        return Err(ThoughtRepositoryError::duplicate_day(&day_key).into());
                    }

                    let row: ThoughtRow = diesel::insert_into(thoughts::table)
                        .values(NewThoughtRow::from_new_thought(&new_thought))
                        .returning(ThoughtRow::as_returning())
                        .get_result(conn)?;

                    // The constraint, not the pre-check above, decides races:
                    // a concurrent winner makes this insert violate
                    // UNIQUE(owner_token, day_key) and rolls everything back.
                    diesel::insert_into(daily_claims::table)
                        .values(NewClaimRow {
                            thought_id: row.id,
                            owner_token: &new_thought.owner_token,
                            day_key: &day_key,
                        })
                        .execute(conn)?;

                    Ok(row)
                });

                result
                    .map(ThoughtRow::into_thought)
                    .map_err(|err| resolve_tx_error(err, Some(&day_key)))
            })
            .await
    }

    async fn list_chronological(&self) -> Result<Vec<Thought>, ThoughtRepositoryError> {
        self.pool
            .run(|conn| {
                let rows: Vec<ThoughtRow> = thoughts::table
                    .order((thoughts::created_at.asc(), thoughts::id.asc()))
                    .select(ThoughtRow::as_select())
                    .load(conn)
                    .map_err(map_diesel_error)?;
                Ok(rows.into_iter().map(ThoughtRow::into_thought).collect())
            })
            .await
    }

    async fn find_credential(
        &self,
        id: i64,
    ) -> Result<Option<StoredCredential>, ThoughtRepositoryError> {
        self.pool
            .run(move |conn| {
                let stored: Option<Option<String>> = thoughts::table
                    .find(id)
                    .select(thoughts::edit_token)
                    .first(conn)
                    .optional()
                    .map_err(map_diesel_error)?;
                Ok(stored.map(|edit_token| StoredCredential { edit_token }))
            })
            .await
    }

    async fn update_text(
        &self,
        id: i64,
        new_text: String,
        updated_at: DateTime<Utc>,
    ) -> Result<Thought, ThoughtRepositoryError> {
        self.pool
            .run(move |conn| {
                let result = conn.immediate_transaction::<ThoughtRow, TxError, _>(|conn| {
                    let affected = diesel::update(thoughts::table.find(id))
                        .set((
                            thoughts::thought_text.eq(&new_text),
                            thoughts::updated_at.eq(updated_at.naive_utc()),
                        ))
                        .execute(conn)?;
                    if affected == 0 {
                        return Err(ThoughtRepositoryError::not_found(id).into());
                    }

                    let row = thoughts::table
                        .find(id)
                        .select(ThoughtRow::as_select())
                        .first(conn)?;
                    Ok(row)
                });

                result
                    .map(ThoughtRow::into_thought)
                    .map_err(|err| resolve_tx_error(err, None))
            })
            .await
    }

    async fn delete_with_claim(&self, id: i64) -> Result<(), ThoughtRepositoryError> {
        self.pool
            .run(move |conn| {
                let result = conn.immediate_transaction::<(), TxError, _>(|conn| {
                    // Claim first: the slot re-opens in the same transaction
                    // that removes the thought, never separately.
                    diesel::delete(daily_claims::table.filter(daily_claims::thought_id.eq(id)))
                        .execute(conn)?;

                    let affected = diesel::delete(thoughts::table.find(id)).execute(conn)?;
                    if affected == 0 {
                        return Err(ThoughtRepositoryError::not_found(id).into());
                    }
                    Ok(())
                });

                result.map_err(|err| resolve_tx_error(err, None))
            })
            .await
    }

    async fn delete_all(&self) -> Result<u64, ThoughtRepositoryError> {
        self.pool
            .run(|conn| {
                let result = conn.immediate_transaction::<u64, TxError, _>(|conn| {
                    let removed = diesel::delete(thoughts::table).execute(conn)?;
                    diesel::delete(daily_claims::table).execute(conn)?;
                    Ok(removed as u64)
                });

                result.map_err(|err| resolve_tx_error(err, None))
            })
            .await
    }
}
