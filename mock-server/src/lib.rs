//! In-memory stand-in for the PastUs backend.
//!
//! Implements the HTTP contracts the client depends on with seeded data, so
//! the HTTP data source can be exercised end-to-end without the real server.
//! Responses follow the `{status, message, data}` envelope except where the
//! contract says otherwise (like toggle, availability checks, token actions).

mod account;
mod auth;
mod posts;
pub mod state;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub use state::{Db, Store};

pub fn app() -> Router {
    app_with_store(Store::seeded())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = std::sync::Arc::new(tokio::sync::RwLock::new(store));
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/check-id", post(auth::check_login_id))
        .route("/auth/check-phone", post(auth::check_phone))
        .route("/auth/find-account", post(auth::find_account))
        .route("/auth/verify", post(auth::verify_code))
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/trending", get(posts::trending_posts))
        .route("/posts/search", get(posts::search_posts))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::replace_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/posts/{id}/tags", get(posts::post_tags))
        .route("/posts/{id}/like", post(posts::toggle_like))
        .route("/tags/trending", get(posts::trending_tags))
        .route("/users/me/dashboard", get(account::dashboard))
        .route(
            "/users/me/detail",
            get(account::account_detail).patch(account::update_account),
        )
        .route("/users/me/posts", get(account::archive_posts))
        .route("/notifications", get(account::list_notifications))
        .route("/notifications/{id}", get(account::get_notification))
        .route("/tokens/{action}", post(account::token_action))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Error answer carrying the `{status, message}` body.
#[derive(Debug)]
pub struct Failure(StatusCode, String);

impl Failure {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self(status, message.into())
    }

    fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "로그인이 필요합니다.")
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{what}을(를) 찾을 수 없습니다."))
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = json!({ "status": self.0.as_u16(), "message": self.1 });
        (self.0, Json(body)).into_response()
    }
}

type Reply = Result<(StatusCode, Json<Value>), Failure>;

fn envelope<T: Serialize>(status: StatusCode, message: &str, data: T) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "status": status.as_u16(), "message": message, "data": data })),
    )
}

fn ack(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "status": status.as_u16(), "message": message })))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// The signed-in user id, if the request carries a live session token.
fn session_user(store: &Store, headers: &HeaderMap) -> Option<u64> {
    bearer(headers).and_then(|token| store.sessions.get(token).copied())
}

fn require_user(store: &Store, headers: &HeaderMap) -> Result<u64, Failure> {
    session_user(store, headers).ok_or_else(Failure::unauthorized)
}
