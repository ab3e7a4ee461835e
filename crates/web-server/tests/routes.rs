use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use configuration::AnalysisConfig;
use database::DbRepository;
use sqlx::PgPool;
use tower::ServiceExt;
use web_server::{router, AppState};

fn app() -> Router {
    let pool = PgPool::connect_lazy("postgres://tickerscope@localhost/tickerscope").unwrap();
    router(AppState::new(DbRepository::new(pool), AnalysisConfig::default()))
}

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_answers_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_date_is_bad_request() {
    let (status, body) = get("/api/ohlcv/AAPL/2020-13-01/2020-12-31").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("startDate"));
}

#[tokio::test]
async fn reversed_window_is_bad_request() {
    let (status, body) = get("/api/ohlcv/aapl/2020-02-01/2020-01-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("endDate"));
}

#[tokio::test]
async fn unknown_direction_is_bad_request() {
    let (status, body) = get("/api/ohlcv/AAPL/2020-01-01/2020-01-31/sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("sideways"));
}

#[tokio::test]
async fn adjacent_route_checks_the_window_before_the_direction() {
    let (status, body) = get("/api/ohlcv/AAPL/2020-01-31/2020-01-01/before").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("endDate"));
}
