use axum::{Json, extract::State};
use sea_orm::ConnectionTrait;
use serde_json::{Value, json};

use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database = match state.db().execute_unprepared("SELECT 1").await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!("Health check could not reach the database: {}", e);
            "unavailable"
        }
    };

    Json(json!({
        "status": "ok",
        "service": "shelfmark",
        "database": database,
        "version": env!("CARGO_PKG_VERSION")
    }))
}
