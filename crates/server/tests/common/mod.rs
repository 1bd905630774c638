#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use polls::{AppState, app, db};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tower::ServiceExt;

pub async fn test_state() -> AppState {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    // Single connection so every query sees the same in-memory database.
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    db::init_schema(&db).await.unwrap();

    AppState { db }
}

/// Creates a question published `days` offset from now (negative for the
/// past, positive for the future), optionally with a single choice.
pub async fn create_question(state: &AppState, text: &str, days: i64, with_choice: bool) -> i64 {
    let pub_date = Utc::now() + Duration::days(days);
    let id = db::create_question(&state.db, text, pub_date).await.unwrap();
    if with_choice {
        db::add_choice(&state.db, id, "Choice A", 0).await.unwrap();
    }
    id
}

pub async fn get(state: &AppState, uri: &str) -> (StatusCode, String) {
    let response = app(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Posts a urlencoded form. Returns the status, the Location header if
/// any, and the response body.
pub async fn post_form(
    state: &AppState,
    uri: &str,
    form: &str,
) -> (StatusCode, Option<String>, String) {
    let response = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, location, String::from_utf8(bytes.to_vec()).unwrap())
}
