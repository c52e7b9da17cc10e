//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use mortgage_calculator::{
    api::create_router,
    cache::{CacheKey, CalcRepository, ManualClock, Store},
    calc::MortgageCalculator,
    models::{CalcProgram, CalculateRequest},
    service::CalcService,
    AppState, Config,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

// 2024-01-15T00:00:00Z
const START: i64 = 1_705_276_800;
const TTL: u64 = 100;

struct TestApp {
    router: Router,
    store: Arc<Store>,
    clock: Arc<ManualClock>,
}

fn create_test_app() -> Router {
    create_router(AppState::from_config(&Config::default()))
}

fn create_manual_app() -> TestApp {
    let clock = Arc::new(ManualClock::new(START));
    let store = Arc::new(Store::new(clock.clone()));
    let repository = Arc::new(CalcRepository::new(store.clone(), TTL));
    let calculator = Arc::new(MortgageCalculator::new(clock.clone()));
    let state = AppState::new(CalcService::new(repository, calculator));

    TestApp {
        router: create_router(state),
        store,
        clock,
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn execute(app: &Router, body: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/execute")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

const SALARY_BODY: &str =
    r#"{"object_cost":5000000,"initial_payment":1000000,"months":240,"program":{"salary":true}}"#;

// == Execute Endpoint Tests ==

#[tokio::test]
async fn test_execute_success() {
    let app = create_manual_app();

    let response = execute(&app.router, SALARY_BODY).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["params"]["object_cost"], 5_000_000);
    assert_eq!(json["program"]["salary"], true);
    assert_eq!(json["aggregates"]["rate"], 8);
    assert_eq!(json["aggregates"]["loan_sum"], 4_000_000);
    assert_eq!(json["aggregates"]["monthly_payment"], 33_458);
    assert_eq!(json["aggregates"]["overpayment"], 4_029_920);
    assert_eq!(json["aggregates"]["last_payment_date"], "2044-01-15");
}

#[tokio::test]
async fn test_execute_is_memoized() {
    let app = create_manual_app();

    let first = body_to_json(execute(&app.router, SALARY_BODY).await.into_body()).await;
    app.clock.advance(TTL as i64 / 2);
    let second = body_to_json(execute(&app.router, SALARY_BODY).await.into_body()).await;

    assert_eq!(first, second);

    let stats = body_to_json(get(&app.router, "/stats").await.into_body()).await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["writes"], 1);
    assert_eq!(stats["total_entries"], 1);
}

#[tokio::test]
async fn test_execute_recomputes_after_ttl() {
    let app = create_manual_app();

    let first = body_to_json(execute(&app.router, SALARY_BODY).await.into_body()).await;
    app.clock.advance(TTL as i64 + 86_400);
    let second = body_to_json(execute(&app.router, SALARY_BODY).await.into_body()).await;

    assert_eq!(first["aggregates"]["last_payment_date"], "2044-01-15");
    assert_eq!(second["aggregates"]["last_payment_date"], "2044-01-16");

    let stats = body_to_json(get(&app.router, "/stats").await.into_body()).await;
    assert_eq!(stats["misses"], 2);
}

#[tokio::test]
async fn test_execute_no_program() {
    let app = create_test_app();

    let response = execute(
        &app,
        r#"{"object_cost":100,"initial_payment":20,"months":12,"program":{}}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "choose program");
}

#[tokio::test]
async fn test_execute_too_many_programs() {
    let app = create_test_app();

    let response = execute(
        &app,
        r#"{"object_cost":100,"initial_payment":20,"months":12,"program":{"base":true,"military":true}}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "choose only 1 program");
}

#[tokio::test]
async fn test_execute_insufficient_initial_payment() {
    let app = create_manual_app();

    let response = execute(
        &app.router,
        r#"{"object_cost":5000000,"initial_payment":999999,"months":240,"program":{"base":true}}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "the initial payment should be more");
    assert!(app.store.is_empty(), "Failed calculations must not be cached");
}

#[tokio::test]
async fn test_execute_term_too_long_is_not_cached() {
    let app = create_manual_app();

    let response = execute(
        &app.router,
        r#"{"object_cost":5000000,"initial_payment":1000000,"months":200000,"program":{"salary":true}}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "failed to calculate params");
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_execute_invalid_json() {
    let app = create_test_app();

    let response = execute(&app, "not valid json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_execute_empty_body() {
    let app = create_test_app();

    let response = execute(&app, "").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_cache_list_empty() {
    let app = create_test_app();

    let response = get(&app, "/cache").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, Value::Array(vec![]));
}

#[tokio::test]
async fn test_cache_list_entries() {
    let app = create_manual_app();

    execute(&app.router, SALARY_BODY).await;
    execute(
        &app.router,
        r#"{"object_cost":100,"initial_payment":20,"months":12,"program":{"military":true}}"#,
    )
    .await;

    let response = get(&app.router, "/cache").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], 1);
    assert_eq!(entries[0]["params"]["months"], 240);
    assert_eq!(entries[0]["program"]["salary"], true);
    assert_eq!(entries[1]["id"], 2);
    assert_eq!(entries[1]["aggregates"]["monthly_payment"], 7);
}

#[tokio::test]
async fn test_cache_list_fails_on_corrupt_entry() {
    let app = create_manual_app();

    execute(&app.router, SALARY_BODY).await;
    let key = CacheKey::derive(&CalculateRequest {
        object_cost: 100,
        initial_payment: 20,
        months: 12,
        program: CalcProgram::base(),
    })
    .unwrap();
    app.store.set(key.into_string(), "corrupt", TTL);

    let response = get(&app.router, "/cache").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The calculation path keeps working.
    let response = execute(&app.router, SALARY_BODY).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    let response = get(&app, "/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 0);
    assert_eq!(json["misses"], 0);
    assert_eq!(json["total_entries"], 0);
    assert_eq!(json["hit_rate"], 0.0);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app();

    let response = get(&app, "/nonexistent").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
