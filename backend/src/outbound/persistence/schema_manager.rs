//! Idempotent, additive schema management.
//!
//! [`ensure_schema`] brings any database (empty, current, or created by the
//! token-less first generation) to the current layout without touching
//! existing rows. Every "does X exist" decision is answered by querying
//! `sqlite_master` / `pragma_table_info`, never assumed, because mixed
//! generations may open the same file during a rollout.
//!
//! Upgrade steps are strictly additive: `CREATE TABLE IF NOT EXISTS`,
//! `ALTER TABLE ... ADD COLUMN`, and index creation. Nothing here drops or
//! rewrites columns or rows.

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info};

use super::pool::{DbPool, PoolError};

/// Errors raised while ensuring the schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The storage engine is unreachable or timed out. Fatal to the caller;
    /// never retried here.
    #[error("storage unavailable while ensuring schema: {message}")]
    Unavailable { message: String },

    /// A DDL or introspection statement failed.
    #[error("schema upgrade failed: {message}")]
    Upgrade { message: String },
}

impl SchemaError {
    fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    fn upgrade(message: impl Into<String>) -> Self {
        Self::Upgrade {
            message: message.into(),
        }
    }
}

impl From<PoolError> for SchemaError {
    fn from(error: PoolError) -> Self {
        Self::unavailable(error.to_string())
    }
}

fn map_diesel(error: diesel::result::Error) -> SchemaError {
    match &error {
        diesel::result::Error::DatabaseError(_, info)
            if info.message().contains("database is locked") =>
        {
            SchemaError::unavailable(info.message().to_owned())
        }
        _ => SchemaError::upgrade(error.to_string()),
    }
}

#[derive(QueryableByName)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

fn object_exists(
    conn: &mut SqliteConnection,
    kind: &str,
    name: &str,
) -> Result<bool, SchemaError> {
    let rows: Vec<NameRow> =
        sql_query("SELECT name FROM sqlite_master WHERE type = ? AND name = ?")
            .bind::<Text, _>(kind)
            .bind::<Text, _>(name)
            .load(conn)
            .map_err(map_diesel)?;
    Ok(!rows.is_empty())
}

fn table_exists(conn: &mut SqliteConnection, table: &str) -> Result<bool, SchemaError> {
    object_exists(conn, "table", table)
}

fn index_exists(conn: &mut SqliteConnection, index: &str) -> Result<bool, SchemaError> {
    object_exists(conn, "index", index)
}

fn column_exists(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
) -> Result<bool, SchemaError> {
    let rows: Vec<NameRow> = sql_query("SELECT name FROM pragma_table_info(?)")
        .bind::<Text, _>(table)
        .load(conn)
        .map_err(map_diesel)?;
    Ok(rows.iter().any(|row| row.name == column))
}

fn execute(conn: &mut SqliteConnection, statement: &str) -> Result<(), SchemaError> {
    sql_query(statement).execute(conn).map_err(map_diesel)?;
    Ok(())
}

fn add_column_if_missing(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<(), SchemaError> {
    if column_exists(conn, table, column)? {
        debug!(table, column, "column already present");
        return Ok(());
    }
    execute(
        conn,
        &format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"),
    )?;
    info!(table, column, "added column");
    Ok(())
}

fn create_index_if_missing(
    conn: &mut SqliteConnection,
    index: &str,
    definition: &str,
) -> Result<(), SchemaError> {
    if index_exists(conn, index)? {
        return Ok(());
    }
    execute(conn, definition)?;
    info!(index, "created index");
    Ok(())
}

/// Bring the connected database to the current schema generation.
///
/// Safe to call repeatedly and concurrently with older deployments; each
/// step checks live catalog state before acting and only ever adds.
pub fn ensure_schema(conn: &mut SqliteConnection) -> Result<(), SchemaError> {
    // Generation 1: the base table, as the token-less deployment created it.
    if !table_exists(conn, "thoughts")? {
        execute(
            conn,
            "CREATE TABLE IF NOT EXISTS thoughts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                thought_text TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )?;
        info!("created thoughts table");
    }

    // Generation 2: additive columns for the token-based API.
    add_column_if_missing(conn, "thoughts", "edit_token", "TEXT")?;
    add_column_if_missing(conn, "thoughts", "updated_at", "TIMESTAMP")?;
    add_column_if_missing(conn, "thoughts", "owner_token", "TEXT")?;

    // The uniqueness guard. The UNIQUE(owner_token, day_key) constraint is
    // the arbiter of the daily limit across all concurrent writers.
    if !table_exists(conn, "daily_claims")? {
        execute(
            conn,
            "CREATE TABLE IF NOT EXISTS daily_claims (
                thought_id INTEGER NOT NULL UNIQUE,
                owner_token TEXT NOT NULL,
                day_key TEXT NOT NULL,
                UNIQUE(owner_token, day_key)
            )",
        )?;
        info!("created daily_claims table");
    }

    create_index_if_missing(
        conn,
        "idx_thoughts_created_at",
        "CREATE INDEX idx_thoughts_created_at ON thoughts (created_at)",
    )?;
    create_index_if_missing(
        conn,
        "idx_thoughts_owner_token",
        "CREATE INDEX idx_thoughts_owner_token ON thoughts (owner_token)",
    )?;

    Ok(())
}

/// Run [`ensure_schema`] through the pool, for startup and test harnesses.
pub async fn ensure_schema_on(pool: &DbPool) -> Result<(), SchemaError> {
    pool.run(|conn| ensure_schema(conn)).await
}
