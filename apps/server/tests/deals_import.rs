use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use fxdeals_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn build_test_router() -> (Router, TempDir) {
    build_test_router_with_timeout(Duration::from_secs(30)).await
}

async fn build_test_router_with_timeout(request_timeout: Duration) -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout,
        log_format: "text".to_string(),
    };
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

fn deal(id: &str, from: &str, to: &str, amount: f64) -> Value {
    json!({
        "dealUniqueId": id,
        "fromCurrency": from,
        "toCurrency": to,
        "dealTimestamp": "2024-01-15T10:30:00Z",
        "dealAmount": amount,
    })
}

async fn post_raw(app: &Router, body: String) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/deals/import")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn import(app: &Router, batch: Value) -> (StatusCode, Value) {
    post_raw(app, batch.to_string()).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn stored_count(app: &Router) -> i64 {
    let (status, body) = get(app, "/api/v1/deals-count").await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    value["count"].as_i64().unwrap()
}

#[tokio::test]
async fn single_valid_deal_is_created() {
    let (app, _tmp) = build_test_router().await;

    let (status, report) = import(&app, json!([deal("id-1", "USD", "EUR", 100.5)])).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        report,
        json!({ "successCount": 1, "failureCount": 0, "failures": [] })
    );

    let (status, body) = get(&app, "/api/v1/deals/id-1").await;
    assert_eq!(status, StatusCode::OK);
    let stored: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stored["dealUniqueId"], "id-1");
    assert_eq!(stored["fromCurrency"], "USD");
    assert_eq!(stored["toCurrency"], "EUR");
}

#[tokio::test]
async fn reimporting_the_same_deal_is_a_duplicate() {
    let (app, _tmp) = build_test_router().await;
    let batch = json!([deal("id-dup", "USD", "EUR", 10.0)]);

    let (_, first) = import(&app, batch.clone()).await;
    assert_eq!(first["successCount"], 1);

    let (status, second) = import(&app, batch).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["successCount"], 0);
    assert_eq!(second["failureCount"], 1);
    assert_eq!(second["failures"][0]["dealId"], "id-dup");
    assert_eq!(
        second["failures"][0]["error"],
        "Duplicate deal: Deal with ID id-dup already exists."
    );
    assert_eq!(stored_count(&app).await, 1);
}

#[tokio::test]
async fn invalid_currency_is_reported_and_not_stored() {
    let (app, _tmp) = build_test_router().await;

    let (status, report) = import(&app, json!([deal("id-bad", "USDOLLAR", "EUR", 10.0)])).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report["successCount"], 0);
    assert_eq!(report["failureCount"], 1);
    let error = report["failures"][0]["error"].as_str().unwrap();
    assert!(error.starts_with("Validation failed: "), "{error}");
    assert!(error.contains("From Currency ISO Code must be 3 characters"));

    let (status, _) = get(&app, "/api/v1/deals/id-bad").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn partial_failure_keeps_successful_rows() {
    let (app, _tmp) = build_test_router().await;
    let batch = json!([
        deal("id-301", "USD", "EUR", 10.0),
        deal("id-302", "USD", "EUR", -5.0),
        deal("id-303", "GBP", "JPY", 20.0),
    ]);

    let (status, report) = import(&app, batch).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report["successCount"], 2);
    assert_eq!(report["failureCount"], 1);
    assert_eq!(report["failures"][0]["dealId"], "id-302");
    assert_eq!(
        report["failures"][0]["error"],
        "Validation failed: Deal Amount must be positive"
    );

    assert_eq!(stored_count(&app).await, 2);
    assert_eq!(get(&app, "/api/v1/deals/id-301").await.0, StatusCode::OK);
    assert_eq!(get(&app, "/api/v1/deals/id-303").await.0, StatusCode::OK);
}

#[tokio::test]
async fn missing_fields_are_per_record_failures() {
    let (app, _tmp) = build_test_router().await;
    let batch = json!([{ "fromCurrency": "USD" }, deal("id-ok", "USD", "EUR", 1.0)]);

    let (status, report) = import(&app, batch).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report["successCount"], 1);
    assert_eq!(report["failures"][0]["dealId"], "");
    let error = report["failures"][0]["error"].as_str().unwrap();
    assert!(error.contains("Deal Unique Id cannot be null"));
    assert!(error.contains("Deal Amount cannot be null"));
}

#[tokio::test]
async fn empty_batch_returns_empty_report() {
    let (app, _tmp) = build_test_router().await;

    let (status, report) = import(&app, json!([])).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        report,
        json!({ "successCount": 0, "failureCount": 0, "failures": [] })
    );
}

#[tokio::test]
async fn malformed_payload_is_rejected_as_a_whole() {
    let (app, _tmp) = build_test_router().await;

    for body in ["{not json", r#"{"dealUniqueId":"x"}"#, r#"[{"dealAmount":"abc"}]"#] {
        let (status, error) = post_raw(&app, body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(error["code"], 400);
        assert!(error["message"]
            .as_str()
            .unwrap()
            .starts_with("Request body is malformed or has incorrect data types."));
    }
    assert_eq!(stored_count(&app).await, 0);
}

#[tokio::test]
async fn unknown_deal_is_not_found() {
    let (app, _tmp) = build_test_router().await;
    let (status, body) = get(&app, "/api/v1/deals/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], 404);
}

#[tokio::test]
async fn health_and_readiness_probes() {
    let (app, _tmp) = build_test_router().await;

    let (status, body) = get(&app, "/api/v1/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    let (status, body) = get(&app, "/api/v1/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn openapi_document_lists_import_route() {
    let (app, _tmp) = build_test_router().await;
    let (status, body) = get(&app, "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    let doc: Value = serde_json::from_slice(&body).unwrap();
    assert!(doc["paths"]["/api/v1/deals/import"]["post"].is_object());
}

#[tokio::test]
async fn amounts_round_trip_exactly() {
    let (app, _tmp) = build_test_router().await;
    let body = r#"[
        {"dealUniqueId": "big", "fromCurrency": "USD", "toCurrency": "EUR",
         "dealTimestamp": "2024-01-15T10:30:00Z", "dealAmount": 12345678901234567.89},
        {"dealUniqueId": "scaled", "fromCurrency": "USD", "toCurrency": "EUR",
         "dealTimestamp": "2024-01-15T10:30:00Z", "dealAmount": 100.50}
    ]"#;

    let (status, report) = post_raw(&app, body.to_string()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report["successCount"], 2);

    for (id, expected) in [("big", "12345678901234567.89"), ("scaled", "100.50")] {
        let (status, body) = get(&app, &format!("/api/v1/deals/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        let stored: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(stored["dealAmount"].to_string(), expected);
    }
}

#[tokio::test]
async fn long_import_is_not_cut_off_by_request_timeout() {
    let (app, _tmp) = build_test_router_with_timeout(Duration::from_millis(1)).await;
    let batch: Vec<Value> = (0..300)
        .map(|i| deal(&format!("slow-{i}"), "USD", "EUR", 1.0))
        .collect();

    let (status, report) = import(&app, Value::Array(batch)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report["successCount"], 300);
    assert_eq!(report["failureCount"], 0);
}

#[tokio::test]
async fn deal_with_id_count_can_be_looked_up() {
    let (app, _tmp) = build_test_router().await;
    import(&app, json!([deal("count", "USD", "EUR", 5.0)])).await;

    let (status, body) = get(&app, "/api/v1/deals/count").await;
    assert_eq!(status, StatusCode::OK);
    let stored: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stored["dealUniqueId"], "count");
    assert_eq!(stored_count(&app).await, 1);
}
