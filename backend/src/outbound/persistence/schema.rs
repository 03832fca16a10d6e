//! Diesel table definitions for the SQLite schema.
//!
//! These must match what the schema manager creates and upgrades to. The
//! nullable columns are deliberate: generation-1 databases gained
//! `edit_token`, `updated_at`, and `owner_token` through additive `ALTER
//! TABLE` steps, so pre-existing rows hold NULL there.

diesel::table! {
    /// Persisted thoughts, one row per submission.
    thoughts (id) {
        /// Monotonically assigned identity (`AUTOINCREMENT`).
        id -> BigInt,
        /// Display label of the author; not an identity.
        username -> Text,
        /// Body content.
        thought_text -> Text,
        /// Insertion instant (UTC); immutable; defines listing order.
        created_at -> Timestamp,
        /// Edit capability; NULL on generation-1 rows.
        edit_token -> Nullable<Text>,
        /// Stamped on every edit; NULL until the first one.
        updated_at -> Nullable<Timestamp>,
        /// Anonymous owner token; NULL on generation-1 rows.
        owner_token -> Nullable<Text>,
    }
}

diesel::table! {
    /// Daily-uniqueness guard: one row per claimed (owner token, UTC day).
    ///
    /// `UNIQUE(owner_token, day_key)` in the DDL is the final arbiter of the
    /// one-thought-per-day rule.
    daily_claims (thought_id) {
        /// Back-reference to the guarded thought; unique.
        thought_id -> BigInt,
        /// Anonymous owner token holding the slot.
        owner_token -> Text,
        /// UTC calendar day (`YYYY-MM-DD`) of the claim.
        day_key -> Text,
    }
}

diesel::joinable!(daily_claims -> thoughts (thought_id));
diesel::allow_tables_to_appear_in_same_query!(thoughts, daily_claims);
