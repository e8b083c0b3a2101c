//! HTTP API integration tests
//!
//! Exercises the full Rocket application against an in-process memory
//! backend. Redis-surface endpoints are verified to reject cleanly when no
//! Redis is configured.

use cachefront_infrastructure::cache::{CacheAdapter, MemoryCache};
use cachefront_infrastructure::config::{AppConfig, CacheSettings};
use cachefront_server::{build_rocket, AppState};
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

async fn test_client() -> Client {
    let settings = CacheSettings {
        namespace: "test".to_string(),
        ..CacheSettings::default()
    };
    let backend = Arc::new(MemoryCache::new(&settings));
    let state = AppState {
        cache: CacheAdapter::new(backend, &settings),
        redis: None,
        config: AppConfig::default(),
        started_at: Instant::now(),
    };

    Client::tracked(build_rocket(state))
        .await
        .expect("valid rocket instance")
}

#[rocket::async_test]
async fn set_then_get_entry() {
    let client = test_client().await;

    let response = client
        .post("/cache/entries")
        .header(ContentType::JSON)
        .body(json!({ "key": "user:1", "value": { "name": "alice" } }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client.get("/cache/entries/user:1").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.expect("json body");
    assert_eq!(body["key"], "user:1");
    assert_eq!(body["value"]["name"], "alice");
}

#[rocket::async_test]
async fn get_missing_entry_is_404() {
    let client = test_client().await;

    let response = client.get("/cache/entries/absent").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.expect("json body");
    assert_eq!(body["code"], "NOT_FOUND");
}

#[rocket::async_test]
async fn empty_key_is_rejected() {
    let client = test_client().await;

    let response = client
        .post("/cache/entries")
        .header(ContentType::JSON)
        .body(json!({ "key": "", "value": 1 }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn zero_ttl_is_rejected() {
    let client = test_client().await;

    let response = client
        .post("/cache/entries")
        .header(ContentType::JSON)
        .body(json!({ "key": "k", "value": 1, "ttl_secs": 0 }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client
        .post("/cache/entries/k/get-or-set")
        .header(ContentType::JSON)
        .body(json!({ "value": 1, "ttl_secs": 0 }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    // Input validation runs before the backend-availability check
    let response = client
        .post("/redis/strings")
        .header(ContentType::JSON)
        .body(json!({ "key": "k", "value": "v", "ttl_secs": 0 }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn delete_entry_reports_presence() {
    let client = test_client().await;

    client
        .post("/cache/entries")
        .header(ContentType::JSON)
        .body(json!({ "key": "k", "value": 1 }).to_string())
        .dispatch()
        .await;

    let response = client.delete("/cache/entries/k").dispatch().await;
    let body: Value = response.into_json().await.expect("json body");
    assert_eq!(body["removed"], true);

    let response = client.delete("/cache/entries/k").dispatch().await;
    let body: Value = response.into_json().await.expect("json body");
    assert_eq!(body["removed"], false);
}

#[rocket::async_test]
async fn get_or_set_prefers_existing_value() {
    let client = test_client().await;

    let response = client
        .post("/cache/entries/answer/get-or-set")
        .header(ContentType::JSON)
        .body(json!({ "value": 42 }).to_string())
        .dispatch()
        .await;
    let body: Value = response.into_json().await.expect("json body");
    assert_eq!(body["value"], 42);
    assert_eq!(body["fresh"], true);

    let response = client
        .post("/cache/entries/answer/get-or-set")
        .header(ContentType::JSON)
        .body(json!({ "value": 99 }).to_string())
        .dispatch()
        .await;
    let body: Value = response.into_json().await.expect("json body");
    assert_eq!(body["value"], 42);
    assert_eq!(body["fresh"], false);
}

#[rocket::async_test]
async fn health_reports_memory_backend() {
    let client = test_client().await;

    let response = client.get("/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.expect("json body");
    assert_eq!(body["backend"], "memory");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["namespace"], "test");
}

#[rocket::async_test]
async fn stats_track_hits_and_misses() {
    let client = test_client().await;

    client
        .post("/cache/entries")
        .header(ContentType::JSON)
        .body(json!({ "key": "k", "value": 1 }).to_string())
        .dispatch()
        .await;
    client.get("/cache/entries/k").dispatch().await;
    client.get("/cache/entries/missing").dispatch().await;

    let response = client.get("/stats").dispatch().await;
    let body: Value = response.into_json().await.expect("json body");
    assert_eq!(body["hits"], 1);
    assert_eq!(body["misses"], 1);
}

#[rocket::async_test]
async fn liveness_and_readiness_probes() {
    let client = test_client().await;

    assert_eq!(client.get("/live").dispatch().await.status(), Status::Ok);
    assert_eq!(client.get("/ready").dispatch().await.status(), Status::Ok);
}

#[rocket::async_test]
async fn redis_endpoints_reject_without_redis() {
    let client = test_client().await;

    let response = client.get("/redis/strings/any").dispatch().await;
    assert_eq!(response.status(), Status::ServiceUnavailable);
    let body: Value = response.into_json().await.expect("json body");
    assert_eq!(body["code"], "REDIS_UNAVAILABLE");

    let response = client
        .post("/redis/strings")
        .header(ContentType::JSON)
        .body(json!({ "key": "k", "value": "v" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::ServiceUnavailable);

    let response = client.get("/redis/probe").dispatch().await;
    assert_eq!(response.status(), Status::ServiceUnavailable);
}

#[rocket::async_test]
async fn hash_routes_coexist() {
    let client = test_client().await;

    // The static /fields and /values tails and the dynamic <field> segment
    // must all resolve; without Redis configured each answers 503, never 404.
    for path in [
        "/redis/hashes/h/fields",
        "/redis/hashes/h/values",
        "/redis/hashes/h/some-field",
    ] {
        let response = client.get(path).dispatch().await;
        assert_eq!(response.status(), Status::ServiceUnavailable, "{}", path);
    }
}

#[rocket::async_test]
async fn entry_ttl_expires() {
    let client = test_client().await;

    client
        .post("/cache/entries")
        .header(ContentType::JSON)
        .body(json!({ "key": "short", "value": 1, "ttl_secs": 1 }).to_string())
        .dispatch()
        .await;

    assert_eq!(
        client.get("/cache/entries/short").dispatch().await.status(),
        Status::Ok
    );

    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;

    assert_eq!(
        client.get("/cache/entries/short").dispatch().await.status(),
        Status::NotFound
    );
}
