//! Privileged maintenance endpoints.
//!
//! The clear-thoughts route is only registered when the operator enables
//! dev maintenance in the running process (see `server::configure`); when
//! the flag is off the path simply does not exist, so every caller gets 404
//! regardless of credentials.

use actix_web::{HttpResponse, delete, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::inbound::http::error::ApiResult;
use crate::inbound::http::state::HttpState;

/// Summary returned by the maintenance clear.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearThoughtsResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Number of thoughts removed.
    pub removed: u64,
}

/// Remove every thought and daily claim. Dev/maintenance only.
#[utoipa::path(
    delete,
    path = "/admin/dev/clear-thoughts",
    description = "Delete all thoughts and daily claims. Only reachable when the \
                   operator has enabled dev maintenance for this process.",
    responses(
        (status = 200, description = "All thoughts removed", body = ClearThoughtsResponse),
        (status = 500, description = "Storage unavailable")
    ),
    tags = ["admin"],
    operation_id = "clearThoughts"
)]
#[delete("/admin/dev/clear-thoughts")]
pub async fn clear_thoughts(state: web::Data<HttpState>) -> ApiResult<web::Json<ClearThoughtsResponse>> {
    let removed = state.thoughts.clear_all().await?;
    warn!(removed, "maintenance clear removed all thoughts");
    Ok(web::Json(ClearThoughtsResponse {
        message: "All thoughts cleared.".to_owned(),
        removed,
    }))
}
