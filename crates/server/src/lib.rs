pub mod admin;
pub mod db;
pub mod error;
pub mod models;
pub mod pages;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ===== App State =====

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
}

// ===== Router =====

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(views::root))
        .route("/health", get(views::health))
        .route("/polls/", get(views::index))
        .route("/polls/:id/", get(views::detail))
        .route("/polls/:id/results/", get(views::results))
        .route("/polls/:id/vote/", post(views::vote))
        .route("/admin/polls/", get(admin::index).post(admin::create))
        .route("/admin/polls/new/", get(admin::new_form))
        .route("/admin/polls/:id/", get(admin::edit_form).post(admin::update))
        .route("/admin/polls/:id/delete/", post(admin::delete))
        .route("/admin/polls/:id/choices/", post(admin::add_choice))
        .route(
            "/admin/polls/:id/choices/:choice_id/",
            post(admin::update_choice),
        )
        .route(
            "/admin/polls/:id/choices/:choice_id/delete/",
            post(admin::delete_choice),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
