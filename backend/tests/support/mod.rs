//! Shared fixtures for integration tests: an isolated SQLite database per
//! test, with the production pool, repository, and service wired over it.

use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use tempfile::TempDir;
use thought_backend::domain::ThoughtService;
use thought_backend::inbound::http::HttpState;
use thought_backend::outbound::persistence::{
    DbPool, DieselThoughtRepository, PoolConfig, ensure_schema_on,
};

/// An isolated database; dropping it removes the files.
pub struct TestDb {
    pub dir: TempDir,
    pub pool: DbPool,
}

/// Create a fresh database with the schema ensured, pooled like production.
pub async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pool = DbPool::new(
        PoolConfig::new(dir.path().join("thoughts.db"))
            .with_max_size(8)
            .with_connection_timeout(Duration::from_secs(10)),
    )
    .expect("build pool");
    ensure_schema_on(&pool).await.expect("ensure schema");
    TestDb { dir, pool }
}

/// The production service over the given pool, with the system clock.
pub fn service(pool: &DbPool) -> Arc<ThoughtService<DieselThoughtRepository>> {
    let repository = Arc::new(DieselThoughtRepository::new(pool.clone()));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    Arc::new(ThoughtService::new(repository, clock))
}

/// HTTP handler state over the given pool.
pub fn http_state(pool: &DbPool) -> HttpState {
    let thought_service = service(pool);
    HttpState::new(thought_service.clone(), thought_service)
}
