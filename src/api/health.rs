use axum::{extract::State, response::Json};
use serde_json::{Value, json};

use super::state::AppState;
use crate::warning;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let (status, store) = match state.sessions.ping().await {
        Ok(()) => ("ok", "ok"),
        Err(e) => {
            warning!("Health check: {}", e);
            ("degraded", "unavailable")
        }
    };

    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "store": store
    }))
}
