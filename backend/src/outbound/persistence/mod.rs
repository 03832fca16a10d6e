//! SQLite persistence adapters using Diesel.
//!
//! Thin adapters: repository code translates between Diesel rows and domain
//! types; business rules live in the domain. Row structs (`models`) and
//! table definitions (`schema`) are internal. All storage errors are mapped
//! to the domain's port error types, and all multi-step writes run inside a
//! single transaction.

mod diesel_thought_repository;
mod models;
mod pool;
mod schema;
mod schema_manager;

pub use diesel_thought_repository::DieselThoughtRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
pub use schema_manager::{SchemaError, ensure_schema, ensure_schema_on};
