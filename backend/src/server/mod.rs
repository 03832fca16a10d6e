//! Server wiring: state construction, route registration, and startup.

mod config;

pub use config::AppConfig;

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
use tracing::warn;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::{Error, ThoughtService};
use crate::inbound::http::health::HealthState;
use crate::inbound::http::{HttpState, admin, health, thoughts};
use crate::middleware::Trace;
use crate::outbound::persistence::{
    DbPool, DieselThoughtRepository, PoolConfig, ensure_schema_on,
};

/// Wire the production port implementations over a connection pool.
pub fn build_http_state(pool: DbPool) -> HttpState {
    let repository = Arc::new(DieselThoughtRepository::new(pool));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let service = Arc::new(ThoughtService::new(repository, clock));
    HttpState::new(service.clone(), service)
}

/// Map malformed JSON bodies onto the standard error envelope instead of
/// Actix's default plain-text response.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        actix_web::Error::from(Error::invalid_request(format!("Invalid JSON body: {err}.")))
    })
}

/// Register application routes and state.
///
/// The maintenance route is registered only when `dev_maintenance` is on;
/// otherwise the path does not exist for any caller.
pub fn configure(
    cfg: &mut web::ServiceConfig,
    state: &HttpState,
    health_state: &web::Data<HealthState>,
    dev_maintenance: bool,
) {
    cfg.app_data(web::Data::new(state.clone()))
        .app_data(health_state.clone())
        .app_data(json_config())
        .service(health::health_check)
        .service(health::ready)
        .service(health::live)
        .service(thoughts::list_thoughts)
        .service(thoughts::create_thought)
        .service(thoughts::update_thought)
        .service(thoughts::delete_thought);

    if dev_maintenance {
        cfg.service(admin::clear_thoughts);
    }
}

fn startup_error(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

/// Build the pool, ensure the schema, and serve until shutdown.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let pool = DbPool::new(
        PoolConfig::new(&config.database_path).with_max_size(config.pool_size),
    )
    .map_err(startup_error)?;

    // One code path for fresh and upgraded databases; fails fast when the
    // storage engine is unreachable.
    ensure_schema_on(&pool).await.map_err(startup_error)?;

    let state = build_http_state(pool);
    let health_state = web::Data::new(HealthState::new());

    if config.dev_maintenance {
        warn!("dev maintenance enabled; the admin clear endpoint is exposed");
    }

    let server_state = state.clone();
    let server_health = health_state.clone();
    let dev_maintenance = config.dev_maintenance;
    let server = HttpServer::new(move || {
        let app = App::new()
            .wrap(Trace)
            .configure(|cfg| configure(cfg, &server_state, &server_health, dev_maintenance));

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}")
                .url("/api-docs/openapi.json", crate::ApiDoc::openapi()),
        );

        app
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
