use axum::{extract::State, response::Json};
use serde_json::{Value, json};

use crate::server::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.len().await,
    }))
}
