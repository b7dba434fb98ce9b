use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::account_service::{self, LoginError, LoginInput, RegisterInput};

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    responses(
        (status = 201, description = "Account created, token issued"),
        (status = 400, description = "Missing field or username/email taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterInput>,
) -> Result<impl IntoResponse, DomainError> {
    tracing::info!("Registration attempt for user: {}", payload.username);

    let token = account_service::register(state.db(), state.config(), payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful",
            "token": token
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    responses(
        (status = 200, description = "Token issued"),
        (status = 400, description = "Invalid password"),
        (status = 404, description = "No account for this email")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginInput>,
) -> Result<impl IntoResponse, LoginError> {
    let token = account_service::login(state.db(), state.config(), payload).await?;
    Ok(Json(json!({ "token": token })))
}
