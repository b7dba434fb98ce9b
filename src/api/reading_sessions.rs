use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::domain::{DomainError, Principal};
use crate::infrastructure::AppState;
use crate::models::ReadingSession;
use crate::services::reading_session_service::{self, CreateSessionInput, UpdateSessionInput};

#[utoipa::path(
    get,
    path = "/api/v1/reading-sessions",
    responses((status = 200, description = "Sessions across the caller's books", body = [ReadingSession])),
    security(("bearer" = []))
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<ReadingSession>>, DomainError> {
    let sessions = reading_session_service::list_sessions(state.db(), &principal).await?;
    Ok(Json(sessions))
}

#[utoipa::path(
    post,
    path = "/api/v1/reading-sessions",
    responses(
        (status = 201, description = "Session recorded", body = ReadingSession),
        (status = 400, description = "Pages or times out of order"),
        (status = 404, description = "UserBook not found")
    ),
    security(("bearer" = []))
)]
pub async fn create_session(
    State(state): State<AppState>,
    principal: Principal,
    Json(input): Json<CreateSessionInput>,
) -> Result<impl IntoResponse, DomainError> {
    let session = reading_session_service::create_session(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reading-sessions/{id}",
    params(("id" = i32, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session", body = ReadingSession),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_session(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<ReadingSession>, DomainError> {
    let session = reading_session_service::get_session(state.db(), &principal, id).await?;
    Ok(Json(session))
}

#[utoipa::path(
    put,
    path = "/api/v1/reading-sessions/{id}",
    params(("id" = i32, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session updated", body = ReadingSession),
        (status = 400, description = "Pages or times out of order"),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_session(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(input): Json<UpdateSessionInput>,
) -> Result<Json<ReadingSession>, DomainError> {
    let session =
        reading_session_service::update_session(state.db(), &principal, id, input).await?;
    Ok(Json(session))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reading-sessions/{id}",
    params(("id" = i32, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_session(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    reading_session_service::delete_session(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
