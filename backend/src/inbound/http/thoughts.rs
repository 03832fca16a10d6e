//! Thought HTTP handlers.
//!
//! ```text
//! GET    /thoughts        list, oldest first
//! POST   /thoughts        create (one per owner token per UTC day)
//! PATCH  /thoughts/{id}   edit text (edit token required)
//! DELETE /thoughts/{id}   remove (edit token required)
//! ```
//!
//! The edit credential is accepted via the `X-Edit-Token` header or the
//! `token` query parameter; the header wins when both are supplied.

use actix_web::http::header::HeaderMap;
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CreateThoughtRequest, CreatedThought, DeleteThoughtRequest, UpdateThoughtRequest,
};
use crate::domain::{Error, Thought};
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::state::HttpState;

/// Header carrying the edit credential.
pub const EDIT_TOKEN_HEADER: &str = "X-Edit-Token";

/// Request payload for creating a thought.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateThoughtBody {
    /// Display name of the author (1–50 characters after trimming).
    pub username: Option<String>,
    /// Body text (1–500 characters after trimming).
    pub text: Option<String>,
    /// Anonymous client token enforcing the daily limit (8–200 characters).
    pub owner_token: Option<String>,
}

/// Request payload for editing a thought's text.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateThoughtBody {
    /// Replacement body text (1–500 characters after trimming).
    pub text: Option<String>,
}

/// Edit credential fallback for clients that cannot set headers.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EditTokenQuery {
    /// Edit token (alternative to the `X-Edit-Token` header).
    pub token: Option<String>,
}

/// A thought as returned by listings and mutations. Never carries tokens.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtResponse {
    /// Unique identifier.
    pub id: i64,
    /// Display name of the author.
    pub username: String,
    /// Body text.
    pub text: String,
    /// Creation timestamp, RFC 3339 UTC.
    pub created_at: String,
    /// Last edit timestamp, RFC 3339 UTC; null until the first edit.
    pub updated_at: Option<String>,
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl From<Thought> for ThoughtResponse {
    fn from(value: Thought) -> Self {
        Self {
            id: value.id,
            username: value.username,
            text: value.text,
            created_at: rfc3339(value.created_at),
            updated_at: value.updated_at.map(rfc3339),
        }
    }
}

/// Creation response: the thought plus its one-time-visible edit token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedThoughtResponse {
    /// Unique identifier.
    pub id: i64,
    /// Display name of the author.
    pub username: String,
    /// Body text.
    pub text: String,
    /// Creation timestamp, RFC 3339 UTC.
    pub created_at: String,
    /// Last edit timestamp; always null on creation.
    pub updated_at: Option<String>,
    /// Secret required to edit or delete this thought. Keep it safe; it is
    /// never returned again.
    pub edit_token: String,
}

impl From<CreatedThought> for CreatedThoughtResponse {
    fn from(value: CreatedThought) -> Self {
        let thought = ThoughtResponse::from(value.thought);
        Self {
            id: thought.id,
            username: thought.username,
            text: thought.text,
            created_at: thought.created_at,
            updated_at: thought.updated_at,
            edit_token: value.edit_token.as_str().to_owned(),
        }
    }
}

fn missing_field_error(field: &str) -> Error {
    Error::invalid_request(format!("Missing required field: {field}."))
        .with_details(json!({ "field": field }))
}

/// Resolve the presented edit credential: header first, then query.
fn extract_edit_token(headers: &HeaderMap, query: &EditTokenQuery) -> String {
    let from_header = headers
        .get(EDIT_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    from_header
        .map(str::to_owned)
        .or_else(|| query.token.as_deref().map(str::trim).map(str::to_owned))
        .unwrap_or_default()
}

/// List all thoughts, oldest first.
#[utoipa::path(
    get,
    path = "/thoughts",
    description = "Fetch all thoughts ordered by creation time ascending (oldest first).",
    responses(
        (status = 200, description = "All stored thoughts, chronologically", body = [ThoughtResponse]),
        (status = 500, description = "Storage unavailable", body = Error)
    ),
    tags = ["thoughts"],
    operation_id = "listThoughts"
)]
#[get("/thoughts")]
pub async fn list_thoughts(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<ThoughtResponse>>> {
    let thoughts = state.thoughts_query.list().await?;
    Ok(web::Json(
        thoughts.into_iter().map(ThoughtResponse::from).collect(),
    ))
}

/// Create a thought (one per owner token per UTC day).
#[utoipa::path(
    post,
    path = "/thoughts",
    request_body = CreateThoughtBody,
    description = "Create a thought. Inputs are trimmed and validated. Enforces one \
                   thought per anonymous token per UTC day; the response includes the \
                   edit token required for later edits and deletes.",
    responses(
        (status = 201, description = "Thought created", body = CreatedThoughtResponse),
        (status = 400, description = "Validation failure", body = Error),
        (status = 409, description = "Duplicate submission for this token today (UTC)", body = Error),
        (status = 500, description = "Storage unavailable", body = Error)
    ),
    tags = ["thoughts"],
    operation_id = "createThought"
)]
#[post("/thoughts")]
pub async fn create_thought(
    state: web::Data<HttpState>,
    payload: web::Json<CreateThoughtBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let username = body.username.ok_or_else(|| missing_field_error("username"))?;
    let text = body.text.ok_or_else(|| missing_field_error("text"))?;
    let owner_token = body
        .owner_token
        .ok_or_else(|| missing_field_error("ownerToken"))?;

    let created = state
        .thoughts
        .create(CreateThoughtRequest {
            username,
            text,
            owner_token,
        })
        .await?;

    Ok(HttpResponse::Created().json(CreatedThoughtResponse::from(created)))
}

/// Update a thought's text (edit token required).
#[utoipa::path(
    patch,
    path = "/thoughts/{id}",
    request_body = UpdateThoughtBody,
    params(
        ("id" = i64, Path, description = "ID of the thought to update"),
        EditTokenQuery,
        ("X-Edit-Token" = Option<String>, Header, description = "Edit token (takes precedence over the query parameter)")
    ),
    responses(
        (status = 200, description = "Thought updated", body = ThoughtResponse),
        (status = 400, description = "Validation failure", body = Error),
        (status = 403, description = "Missing or invalid edit token", body = Error),
        (status = 404, description = "Thought not found", body = Error)
    ),
    tags = ["thoughts"],
    operation_id = "updateThought"
)]
#[patch("/thoughts/{id}")]
pub async fn update_thought(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    request: HttpRequest,
    query: web::Query<EditTokenQuery>,
    payload: web::Json<UpdateThoughtBody>,
) -> ApiResult<web::Json<ThoughtResponse>> {
    let text = payload
        .into_inner()
        .text
        .ok_or_else(|| missing_field_error("text"))?;
    let edit_token = extract_edit_token(request.headers(), &query);

    let updated = state
        .thoughts
        .update(UpdateThoughtRequest {
            id: path.into_inner(),
            edit_token,
            text,
        })
        .await?;

    Ok(web::Json(ThoughtResponse::from(updated)))
}

/// Delete a thought (edit token required).
#[utoipa::path(
    delete,
    path = "/thoughts/{id}",
    params(
        ("id" = i64, Path, description = "ID of the thought to delete"),
        EditTokenQuery,
        ("X-Edit-Token" = Option<String>, Header, description = "Edit token (takes precedence over the query parameter)")
    ),
    responses(
        (status = 204, description = "Thought deleted"),
        (status = 403, description = "Missing or invalid edit token", body = Error),
        (status = 404, description = "Thought not found", body = Error)
    ),
    tags = ["thoughts"],
    operation_id = "deleteThought"
)]
#[delete("/thoughts/{id}")]
pub async fn delete_thought(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    request: HttpRequest,
    query: web::Query<EditTokenQuery>,
) -> ApiResult<HttpResponse> {
    let edit_token = extract_edit_token(request.headers(), &query);

    state
        .thoughts
        .delete(DeleteThoughtRequest {
            id: path.into_inner(),
            edit_token,
        })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
