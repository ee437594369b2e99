use axum::http::StatusCode;
use pipledger::advice::MockAdviceSource;
use pipledger::api::{self, AppState};
use pipledger::config::Config;
use pipledger::db::init_db;
use pipledger::Repository;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

async fn setup_test_app() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    let config = Config {
        port: 0,
        database_path: db_path,
        openai_api_url: "http://example.invalid".to_string(),
        openai_api_key: Some("test-key".to_string()),
        advice_model: "gpt-4o".to_string(),
        start_balance: 100_000.0,
        target_balance: 200_000.0,
    };

    let advisor = Arc::new(MockAdviceSource::default());
    let state = AppState::new(repo, config, advisor);

    (api::create_router(state), temp_dir)
}

fn example_log() -> String {
    [
        "USD/JPY\t成行\t決済",
        "買\t2.7\t147.170[成行]",
        "147.210\t約定済\t147.170\t25/08/22 03:13:25",
        "25/08/21\t+108\t\t25/08/22 03:13:25",
        "-\t063257\t",
        "USD/JPY\t成行\t新規",
        "売\t2.7\t147.174[成行]",
        "147.208\t約定済\t147.174\t25/08/22 03:06:26\t\t0\t25/08/22 03:06:26",
        "-\t063256\t",
    ]
    .join("\n")
}

async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            axum::body::Body::from(value.to_string())
        }
        None => axum::body::Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_summary_for_empty_ledger() {
    let (app, _temp) = setup_test_app().await;

    let (status, body) = request_json(&app, "GET", "/v1/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["count"], 0);
    // unavailable ratios serialize as null
    assert!(body["summary"]["winRate"].is_null());
    assert!(body["summary"]["payoff"].is_null());
    assert_eq!(body["summary"]["totalQtyPl"], 0);
    // no trade days yet: target above start is unreachable at zero pace
    assert_eq!(body["goal"]["status"], "unreachable");
    assert_eq!(body["tagAnalysis"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_summary_after_ingest() {
    let (app, _temp) = setup_test_app().await;
    request_json(
        &app,
        "POST",
        "/v1/ingest",
        Some(serde_json::json!({ "text": example_log() })),
    )
    .await;

    let (status, body) = request_json(&app, "GET", "/v1/summary", None).await;
    assert_eq!(status, StatusCode::OK);

    let summary = &body["summary"];
    assert_eq!(summary["count"], 1);
    assert_eq!(summary["winRate"], 100.0);
    assert_eq!(summary["totalQtyPl"], 108);
    assert_eq!(summary["avgHold"], "6分59秒");
    assert!((summary["totalPips"].as_f64().unwrap() - 0.4).abs() < 0.11);

    // one winning day at 108/day: target is 100k away, far future but projected
    let long_term = &body["longTerm"];
    assert_eq!(long_term["avgDailyPl"], 108.0);
    assert_eq!(body["goal"]["status"], "projected");
    assert!(body["goal"]["days"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_summary_includes_tag_analysis() {
    let (app, _temp) = setup_test_app().await;
    request_json(
        &app,
        "POST",
        "/v1/ingest",
        Some(serde_json::json!({ "text": example_log() })),
    )
    .await;

    let (_, listed) = request_json(&app, "GET", "/v1/trades", None).await;
    let key = listed["trades"][0]["tradeKey"].as_str().unwrap().to_string();
    request_json(
        &app,
        "PUT",
        "/v1/trades/tags",
        Some(serde_json::json!({ "keys": [key], "tags": ["東京時間"] })),
    )
    .await;

    let (_, body) = request_json(&app, "GET", "/v1/summary", None).await;
    let tags = body["tagAnalysis"].as_array().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["tagName"], "東京時間");
    assert_eq!(tags[0]["summary"]["count"], 1);
}

#[tokio::test]
async fn test_calendar_after_ingest() {
    let (app, _temp) = setup_test_app().await;
    request_json(
        &app,
        "POST",
        "/v1/ingest",
        Some(serde_json::json!({ "text": example_log() })),
    )
    .await;

    let (status, body) = request_json(&app, "GET", "/v1/calendar", None).await;
    assert_eq!(status, StatusCode::OK);
    let daily = body["dailyPl"].as_object().unwrap();
    assert_eq!(daily.len(), 1);
    assert!((daily["2025-08-22"].as_f64().unwrap() - 108.0).abs() < 0.5);
}
