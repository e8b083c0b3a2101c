//! Cache entry handlers
//!
//! CRUD over the namespaced cache facade. Values are arbitrary JSON and are
//! stored through whichever backend the server was configured with.
//!
//! ## Endpoints
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | `/entries` | POST | Store an entry |
//! | `/entries/<key>` | GET | Fetch an entry (404 on miss) |
//! | `/entries/<key>` | DELETE | Remove an entry |
//! | `/entries/<key>/get-or-set` | POST | Atomically fetch-or-store |

use rocket::serde::json::Json;
use rocket::{delete, get, post, State};
use serde::{Deserialize, Serialize};

use super::{map_error, parse_ttl, ApiError, ErrorResponse};
use crate::state::AppState;
use cachefront_domain::error::Error;
use rocket::http::Status;

/// Body for storing an entry
#[derive(Debug, Deserialize)]
pub struct SetEntryRequest {
    pub key: String,
    pub value: serde_json::Value,
    /// Entry lifetime; the configured default applies when omitted
    pub ttl_secs: Option<u64>,
}

/// Body for the get-or-set operation
#[derive(Debug, Deserialize)]
pub struct GetOrSetRequest {
    pub value: serde_json::Value,
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct GetOrSetResponse {
    pub key: String,
    pub value: serde_json::Value,
    /// True when the provided value was stored, false when an existing entry won
    pub fresh: bool,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

/// Store an entry
#[post("/entries", data = "<request>")]
pub async fn set_entry(
    state: &State<AppState>,
    request: Json<SetEntryRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let request = request.into_inner();
    if request.key.is_empty() {
        return Err(map_error(Error::invalid_argument("key must not be empty")));
    }

    state
        .cache
        .set(&request.key, &request.value, parse_ttl(request.ttl_secs)?)
        .await
        .map_err(map_error)?;

    Ok(Json(OkResponse { ok: true }))
}

/// Fetch an entry; 404 when absent or expired
#[get("/entries/<key>")]
pub async fn get_entry(
    state: &State<AppState>,
    key: &str,
) -> Result<Json<EntryResponse>, ApiError> {
    let value: Option<serde_json::Value> = state.cache.get(key).await.map_err(map_error)?;

    match value {
        Some(value) => Ok(Json(EntryResponse {
            key: key.to_string(),
            value,
        })),
        None => Err((
            Status::NotFound,
            Json(ErrorResponse::not_found(&format!("entry '{}'", key))),
        )),
    }
}

/// Remove an entry
#[delete("/entries/<key>")]
pub async fn delete_entry(
    state: &State<AppState>,
    key: &str,
) -> Result<Json<RemovedResponse>, ApiError> {
    let removed = state.cache.remove(key).await.map_err(map_error)?;
    Ok(Json(RemovedResponse { removed }))
}

/// Return the cached value for `key`, storing the request body first when absent
#[post("/entries/<key>/get-or-set", data = "<request>")]
pub async fn get_or_set_entry(
    state: &State<AppState>,
    key: &str,
    request: Json<GetOrSetRequest>,
) -> Result<Json<GetOrSetResponse>, ApiError> {
    let request = request.into_inner();
    let (value, fresh) = state
        .cache
        .get_or_set(key, request.value, parse_ttl(request.ttl_secs)?)
        .await
        .map_err(map_error)?;

    Ok(Json(GetOrSetResponse {
        key: key.to_string(),
        value,
        fresh,
    }))
}
