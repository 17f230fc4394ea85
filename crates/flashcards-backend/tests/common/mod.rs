#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use tempfile::TempDir;

use flashcards_backend::state::AppState;
use flashcards_backend::store::CardStore;

pub struct TestApp {
    pub app: axum::Router,
    pub store: Arc<CardStore>,
    _temp: TempDir,
}

/// Router over a throwaway SQLite file, early-review policy at its
/// default (disallowed).
pub async fn create_test_app() -> TestApp {
    create_test_app_with(false).await
}

pub async fn create_test_app_with(allow_early_review: bool) -> TestApp {
    let temp = TempDir::new().expect("failed to create temp dir");
    let db_path = temp.path().join("test.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let store = Arc::new(
        CardStore::connect(&db_url)
            .await
            .expect("store init failed"),
    );
    let state = AppState::new(Arc::clone(&store), allow_early_review);

    TestApp {
        app: flashcards_backend::create_app(state),
        store,
        _temp: temp,
    }
}

pub async fn create_test_store() -> (CardStore, TempDir) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let db_path = temp.path().join("test.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
    let store = CardStore::connect(&db_url)
        .await
        .expect("store init failed");
    (store, temp)
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is not valid json")
}
