pub mod auth;
pub mod users;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::middleware::admin::require_admin;
use crate::state::SharedState;

pub fn api_routes(state: SharedState) -> Router<SharedState> {
    let admin_gate = axum::middleware::from_fn_with_state(state, require_admin);

    Router::new()
        .route("/ping", get(ping))
        // Users
        .route("/users", get(users::list))
        .route("/users", post(users::create).route_layer(admin_gate))
        .route("/users/{id}", get(users::get))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", get(auth::logout))
        .route("/auth/status", get(auth::status))
}

async fn ping() -> Json<Value> {
    Json(json!({ "status": "success", "message": "pong!" }))
}
