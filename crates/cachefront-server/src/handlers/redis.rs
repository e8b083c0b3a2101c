//! Redis surface handlers
//!
//! Thin HTTP layer over the delegated Redis operations. Every endpoint
//! returns 503 with a `REDIS_UNAVAILABLE` code when the server was started
//! without a `cache.redis_url`.
//!
//! ## Endpoints
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | `/strings` | POST | Set a string (optional TTL) |
//! | `/strings/batch` | POST | Set many strings (MSET) |
//! | `/strings/batch-get` | POST | Get many strings (MGET) |
//! | `/strings/<key>` | GET | Get a string |
//! | `/strings/<key>/increment` | POST | INCRBYFLOAT |
//! | `/strings/<key>/decrement` | POST | Negated INCRBYFLOAT |
//! | `/hashes/<key>` | POST | Set a hash field |
//! | `/hashes/<key>/fields` | GET | Hash field names |
//! | `/hashes/<key>/values` | GET | Hash values |
//! | `/hashes/<key>/delete-fields` | POST | Delete hash fields |
//! | `/hashes/<key>/<field>` | GET | Get a hash field |
//! | `/hashes/<key>/<field>/exists` | GET | Hash field existence |
//! | `/hashes/<key>/<field>/increment` | POST | HINCRBYFLOAT |
//! | `/lists/<key>` | GET | LRANGE (start/stop query params) |
//! | `/lists/<key>/back` | POST | RPUSH |
//! | `/lists/<key>/front` | POST | LPUSH |
//! | `/lists/<key>/pop-back` | POST | RPOP |
//! | `/lists/<key>/pop-front` | POST | LPOP |
//! | `/lists/<key>/remove` | POST | LREM (all occurrences) |
//! | `/lists/<key>/length` | GET | LLEN |
//! | `/sets/<key>` | POST/DELETE/GET | SADD / SREM / SMEMBERS |
//! | `/sets/<key>/length` | GET | SCARD |
//! | `/zsets/<key>` | POST/DELETE/GET | ZADD / ZREM / ZRANGE |
//! | `/zsets/<key>/length` | GET | ZCARD |
//! | `/keys/delete` | POST | DEL (multi-key) |
//! | `/keys/<key>/exists` | GET | EXISTS |
//! | `/keys/<key>/rename` | POST | RENAME |
//! | `/keys/<key>/expire` | POST | EXPIRE |
//! | `/probe` | GET | Connectivity round trip |

use cachefront_infrastructure::cache::RedisCache;
use rocket::serde::json::Json;
use rocket::{delete, get, post, State};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{map_error, parse_ttl, ApiError};
use crate::state::AppState;
use cachefront_domain::error::Error;

// ---------------------------------------------------------------------------
// Request/response models
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SetStringRequest {
    pub key: String,
    pub value: String,
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct StringEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchSetRequest {
    pub entries: Vec<StringEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BatchGetRequest {
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchGetResponse {
    pub values: Vec<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct DeltaRequest {
    pub delta: f64,
}

#[derive(Debug, Serialize)]
pub struct NumberResponse {
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct ValueResponse {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct HashSetRequest {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub created: bool,
}

#[derive(Debug, Deserialize)]
pub struct FieldsRequest {
    pub fields: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub struct ValuesResponse {
    pub values: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValueRequest {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct LengthResponse {
    pub length: u64,
}

#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    pub member: String,
}

#[derive(Debug, Serialize)]
pub struct AddedResponse {
    pub added: bool,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

#[derive(Debug, Deserialize)]
pub struct ScoredMemberRequest {
    pub member: String,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct KeysRequest {
    pub keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub new_key: String,
}

#[derive(Debug, Deserialize)]
pub struct ExpireRequest {
    pub ttl_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct AppliedResponse {
    pub applied: bool,
}

#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub ok: bool,
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

#[post("/strings", data = "<request>")]
pub async fn set_string(
    state: &State<AppState>,
    request: Json<SetStringRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let request = request.into_inner();
    let ttl = parse_ttl(request.ttl_secs)?;
    let redis = state.redis()?;
    redis
        .set_string(&request.key, &request.value, ttl)
        .await
        .map_err(map_error)?;
    Ok(Json(OkResponse { ok: true }))
}

#[post("/strings/batch", data = "<request>")]
pub async fn set_strings(
    state: &State<AppState>,
    request: Json<BatchSetRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let redis = state.redis()?;
    let pairs: Vec<(String, String)> = request
        .into_inner()
        .entries
        .into_iter()
        .map(|e| (e.key, e.value))
        .collect();
    redis.set_many(&pairs).await.map_err(map_error)?;
    Ok(Json(OkResponse { ok: true }))
}

#[post("/strings/batch-get", data = "<request>")]
pub async fn get_strings(
    state: &State<AppState>,
    request: Json<BatchGetRequest>,
) -> Result<Json<BatchGetResponse>, ApiError> {
    let redis = state.redis()?;
    let values = redis
        .get_many(&request.into_inner().keys)
        .await
        .map_err(map_error)?;
    Ok(Json(BatchGetResponse { values }))
}

#[get("/strings/<key>")]
pub async fn get_string(
    state: &State<AppState>,
    key: &str,
) -> Result<Json<ValueResponse>, ApiError> {
    let redis = state.redis()?;
    let value = redis.get_string(key).await.map_err(map_error)?;
    Ok(Json(ValueResponse {
        key: key.to_string(),
        value,
    }))
}

#[post("/strings/<key>/increment", data = "<request>")]
pub async fn increment_string(
    state: &State<AppState>,
    key: &str,
    request: Json<DeltaRequest>,
) -> Result<Json<NumberResponse>, ApiError> {
    let redis = state.redis()?;
    let value = redis
        .incr_by_float(key, request.delta)
        .await
        .map_err(map_error)?;
    Ok(Json(NumberResponse { value }))
}

#[post("/strings/<key>/decrement", data = "<request>")]
pub async fn decrement_string(
    state: &State<AppState>,
    key: &str,
    request: Json<DeltaRequest>,
) -> Result<Json<NumberResponse>, ApiError> {
    let redis = state.redis()?;
    let value = redis
        .decr_by_float(key, request.delta)
        .await
        .map_err(map_error)?;
    Ok(Json(NumberResponse { value }))
}

// ---------------------------------------------------------------------------
// Hashes
// ---------------------------------------------------------------------------

#[post("/hashes/<key>", data = "<request>")]
pub async fn hash_set(
    state: &State<AppState>,
    key: &str,
    request: Json<HashSetRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let redis = state.redis()?;
    let created = redis
        .hash_set(key, &request.field, &request.value)
        .await
        .map_err(map_error)?;
    Ok(Json(CreatedResponse { created }))
}

#[get("/hashes/<key>/fields")]
pub async fn hash_fields(
    state: &State<AppState>,
    key: &str,
) -> Result<Json<ValuesResponse>, ApiError> {
    let redis = state.redis()?;
    let values = redis.hash_keys(key).await.map_err(map_error)?;
    Ok(Json(ValuesResponse { values }))
}

#[get("/hashes/<key>/values")]
pub async fn hash_values(
    state: &State<AppState>,
    key: &str,
) -> Result<Json<ValuesResponse>, ApiError> {
    let redis = state.redis()?;
    let values = redis.hash_values(key).await.map_err(map_error)?;
    Ok(Json(ValuesResponse { values }))
}

#[post("/hashes/<key>/delete-fields", data = "<request>")]
pub async fn hash_delete_fields(
    state: &State<AppState>,
    key: &str,
    request: Json<FieldsRequest>,
) -> Result<Json<CountResponse>, ApiError> {
    let redis = state.redis()?;
    let count = redis
        .hash_delete(key, &request.into_inner().fields)
        .await
        .map_err(map_error)?;
    Ok(Json(CountResponse { count }))
}

// Ranked below the static /fields and /values routes on the same segment
#[get("/hashes/<key>/<field>", rank = 2)]
pub async fn hash_get(
    state: &State<AppState>,
    key: &str,
    field: &str,
) -> Result<Json<ValueResponse>, ApiError> {
    let redis = state.redis()?;
    let value = redis.hash_get(key, field).await.map_err(map_error)?;
    Ok(Json(ValueResponse {
        key: format!("{}.{}", key, field),
        value,
    }))
}

#[get("/hashes/<key>/<field>/exists")]
pub async fn hash_exists(
    state: &State<AppState>,
    key: &str,
    field: &str,
) -> Result<Json<ExistsResponse>, ApiError> {
    let redis = state.redis()?;
    let exists = redis.hash_exists(key, field).await.map_err(map_error)?;
    Ok(Json(ExistsResponse { exists }))
}

#[post("/hashes/<key>/<field>/increment", data = "<request>")]
pub async fn hash_increment(
    state: &State<AppState>,
    key: &str,
    field: &str,
    request: Json<DeltaRequest>,
) -> Result<Json<NumberResponse>, ApiError> {
    let redis = state.redis()?;
    let value = redis
        .hash_incr_by_float(key, field, request.delta)
        .await
        .map_err(map_error)?;
    Ok(Json(NumberResponse { value }))
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

#[get("/lists/<key>?<start>&<stop>")]
pub async fn list_range(
    state: &State<AppState>,
    key: &str,
    start: Option<i64>,
    stop: Option<i64>,
) -> Result<Json<ValuesResponse>, ApiError> {
    let redis = state.redis()?;
    let values = redis
        .list_range(key, start.unwrap_or(0), stop.unwrap_or(-1))
        .await
        .map_err(map_error)?;
    Ok(Json(ValuesResponse { values }))
}

#[post("/lists/<key>/back", data = "<request>")]
pub async fn list_push_back(
    state: &State<AppState>,
    key: &str,
    request: Json<ValueRequest>,
) -> Result<Json<LengthResponse>, ApiError> {
    let redis = state.redis()?;
    let length = redis
        .list_push_back(key, &request.value)
        .await
        .map_err(map_error)?;
    Ok(Json(LengthResponse { length }))
}

#[post("/lists/<key>/front", data = "<request>")]
pub async fn list_push_front(
    state: &State<AppState>,
    key: &str,
    request: Json<ValueRequest>,
) -> Result<Json<LengthResponse>, ApiError> {
    let redis = state.redis()?;
    let length = redis
        .list_push_front(key, &request.value)
        .await
        .map_err(map_error)?;
    Ok(Json(LengthResponse { length }))
}

#[post("/lists/<key>/pop-back")]
pub async fn list_pop_back(
    state: &State<AppState>,
    key: &str,
) -> Result<Json<ValueResponse>, ApiError> {
    let redis = state.redis()?;
    let value = redis.list_pop_back(key).await.map_err(map_error)?;
    Ok(Json(ValueResponse {
        key: key.to_string(),
        value,
    }))
}

#[post("/lists/<key>/pop-front")]
pub async fn list_pop_front(
    state: &State<AppState>,
    key: &str,
) -> Result<Json<ValueResponse>, ApiError> {
    let redis = state.redis()?;
    let value = redis.list_pop_front(key).await.map_err(map_error)?;
    Ok(Json(ValueResponse {
        key: key.to_string(),
        value,
    }))
}

#[post("/lists/<key>/remove", data = "<request>")]
pub async fn list_remove(
    state: &State<AppState>,
    key: &str,
    request: Json<ValueRequest>,
) -> Result<Json<CountResponse>, ApiError> {
    let redis = state.redis()?;
    let count = redis
        .list_remove(key, &request.value)
        .await
        .map_err(map_error)?;
    Ok(Json(CountResponse { count }))
}

#[get("/lists/<key>/length")]
pub async fn list_len(
    state: &State<AppState>,
    key: &str,
) -> Result<Json<LengthResponse>, ApiError> {
    let redis = state.redis()?;
    let length = redis.list_len(key).await.map_err(map_error)?;
    Ok(Json(LengthResponse { length }))
}

// ---------------------------------------------------------------------------
// Sets
// ---------------------------------------------------------------------------

#[post("/sets/<key>", data = "<request>")]
pub async fn set_add(
    state: &State<AppState>,
    key: &str,
    request: Json<MemberRequest>,
) -> Result<Json<AddedResponse>, ApiError> {
    let redis = state.redis()?;
    let added = redis.set_add(key, &request.member).await.map_err(map_error)?;
    Ok(Json(AddedResponse { added }))
}

#[delete("/sets/<key>", data = "<request>")]
pub async fn set_remove(
    state: &State<AppState>,
    key: &str,
    request: Json<MemberRequest>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let redis = state.redis()?;
    let removed = redis
        .set_remove(key, &request.member)
        .await
        .map_err(map_error)?;
    Ok(Json(RemovedResponse { removed }))
}

#[get("/sets/<key>")]
pub async fn set_members(
    state: &State<AppState>,
    key: &str,
) -> Result<Json<ValuesResponse>, ApiError> {
    let redis = state.redis()?;
    let values = redis.set_members(key).await.map_err(map_error)?;
    Ok(Json(ValuesResponse { values }))
}

#[get("/sets/<key>/length")]
pub async fn set_len(
    state: &State<AppState>,
    key: &str,
) -> Result<Json<LengthResponse>, ApiError> {
    let redis = state.redis()?;
    let length = redis.set_len(key).await.map_err(map_error)?;
    Ok(Json(LengthResponse { length }))
}

// ---------------------------------------------------------------------------
// Sorted sets
// ---------------------------------------------------------------------------

#[post("/zsets/<key>", data = "<request>")]
pub async fn zset_add(
    state: &State<AppState>,
    key: &str,
    request: Json<ScoredMemberRequest>,
) -> Result<Json<AddedResponse>, ApiError> {
    let redis = state.redis()?;
    let added = redis
        .zset_add(key, &request.member, request.score)
        .await
        .map_err(map_error)?;
    Ok(Json(AddedResponse { added }))
}

#[delete("/zsets/<key>", data = "<request>")]
pub async fn zset_remove(
    state: &State<AppState>,
    key: &str,
    request: Json<MemberRequest>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let redis = state.redis()?;
    let removed = redis
        .zset_remove(key, &request.member)
        .await
        .map_err(map_error)?;
    Ok(Json(RemovedResponse { removed }))
}

#[get("/zsets/<key>?<start>&<stop>")]
pub async fn zset_range(
    state: &State<AppState>,
    key: &str,
    start: Option<i64>,
    stop: Option<i64>,
) -> Result<Json<ValuesResponse>, ApiError> {
    let redis = state.redis()?;
    let values = redis
        .zset_range_by_rank(key, start.unwrap_or(0), stop.unwrap_or(-1))
        .await
        .map_err(map_error)?;
    Ok(Json(ValuesResponse { values }))
}

#[get("/zsets/<key>/length")]
pub async fn zset_len(
    state: &State<AppState>,
    key: &str,
) -> Result<Json<LengthResponse>, ApiError> {
    let redis = state.redis()?;
    let length = redis.zset_len(key).await.map_err(map_error)?;
    Ok(Json(LengthResponse { length }))
}

// ---------------------------------------------------------------------------
// Key management
// ---------------------------------------------------------------------------

#[post("/keys/delete", data = "<request>")]
pub async fn key_delete(
    state: &State<AppState>,
    request: Json<KeysRequest>,
) -> Result<Json<CountResponse>, ApiError> {
    let redis = state.redis()?;
    let count = redis
        .key_delete(&request.into_inner().keys)
        .await
        .map_err(map_error)?;
    Ok(Json(CountResponse { count }))
}

#[get("/keys/<key>/exists")]
pub async fn key_exists(
    state: &State<AppState>,
    key: &str,
) -> Result<Json<ExistsResponse>, ApiError> {
    let redis = state.redis()?;
    let exists = redis.key_exists(key).await.map_err(map_error)?;
    Ok(Json(ExistsResponse { exists }))
}

#[post("/keys/<key>/rename", data = "<request>")]
pub async fn key_rename(
    state: &State<AppState>,
    key: &str,
    request: Json<RenameRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let redis = state.redis()?;
    redis
        .key_rename(key, &request.new_key)
        .await
        .map_err(map_error)?;
    Ok(Json(OkResponse { ok: true }))
}

#[post("/keys/<key>/expire", data = "<request>")]
pub async fn key_expire(
    state: &State<AppState>,
    key: &str,
    request: Json<ExpireRequest>,
) -> Result<Json<AppliedResponse>, ApiError> {
    if request.ttl_secs == 0 {
        return Err(map_error(Error::invalid_argument(
            "ttl_secs must be greater than zero",
        )));
    }
    let redis = state.redis()?;
    let applied = redis
        .key_expire(key, Duration::from_secs(request.ttl_secs))
        .await
        .map_err(map_error)?;
    Ok(Json(AppliedResponse { applied }))
}

// ---------------------------------------------------------------------------
// Probe
// ---------------------------------------------------------------------------

/// Connectivity round trip: plain set, atomic replace with a TTL, read back
#[get("/probe")]
pub async fn probe(state: &State<AppState>) -> Result<Json<ProbeResponse>, ApiError> {
    let redis = state.redis()?;
    let key = "cachefront:probe";

    redis
        .set_string(key, "probe-1", None)
        .await
        .map_err(map_error)?;

    let mut pipe = RedisCache::atomic_pipeline();
    pipe.cmd("SET").arg(key).arg("probe-2").ignore();
    pipe.cmd("EXPIRE").arg(key).arg(60).ignore();
    redis.run_pipeline(&pipe).await.map_err(map_error)?;

    let value = redis.get_string(key).await.map_err(map_error)?;
    Ok(Json(ProbeResponse {
        ok: value.as_deref() == Some("probe-2"),
        value,
    }))
}
