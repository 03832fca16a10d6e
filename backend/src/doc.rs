//! OpenAPI documentation configuration.
//!
//! Aggregates every HTTP endpoint and schema into one [`ApiDoc`] document,
//! served through Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::admin::ClearThoughtsResponse;
use crate::inbound::http::health::HealthResponse;
use crate::inbound::http::thoughts::{
    CreateThoughtBody, CreatedThoughtResponse, ThoughtResponse, UpdateThoughtBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Daily Thought Chain API",
        description = "Submit and retrieve daily thoughts. Each anonymous token may \
                       submit a single thought per UTC day; thoughts are returned in \
                       chronological order."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::health_check,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::thoughts::list_thoughts,
        crate::inbound::http::thoughts::create_thought,
        crate::inbound::http::thoughts::update_thought,
        crate::inbound::http::thoughts::delete_thought,
        crate::inbound::http::admin::clear_thoughts,
    ),
    components(schemas(
        HealthResponse,
        ThoughtResponse,
        CreatedThoughtResponse,
        CreateThoughtBody,
        UpdateThoughtBody,
        ClearThoughtsResponse,
        Error,
        ErrorCode,
    )),
    tags(
        (name = "health", description = "Service status and health checks."),
        (name = "thoughts", description = "Submit and fetch daily thoughts. One per token per UTC day."),
        (name = "admin", description = "Privileged maintenance operations.")
    )
)]
pub struct ApiDoc;
