use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::domain::{DomainError, Principal};
use crate::infrastructure::AppState;
use crate::models::Note;
use crate::services::note_service::{self, CreateNoteInput, UpdateNoteInput};

#[utoipa::path(
    get,
    path = "/api/v1/notes",
    responses((status = 200, description = "The caller's notes", body = [Note])),
    security(("bearer" = []))
)]
pub async fn list_notes(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<Note>>, DomainError> {
    Ok(Json(note_service::list_notes(state.db(), &principal).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/notes",
    responses(
        (status = 201, description = "Note created", body = Note),
        (status = 404, description = "UserBook not found")
    ),
    security(("bearer" = []))
)]
pub async fn create_note(
    State(state): State<AppState>,
    principal: Principal,
    Json(input): Json<CreateNoteInput>,
) -> Result<impl IntoResponse, DomainError> {
    let note = note_service::create_note(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[utoipa::path(
    get,
    path = "/api/v1/notes/{id}",
    params(("id" = i32, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note", body = Note),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_note(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<Note>, DomainError> {
    Ok(Json(note_service::get_note(state.db(), &principal, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/notes/{id}",
    params(("id" = i32, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note updated", body = Note),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_note(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(input): Json<UpdateNoteInput>,
) -> Result<Json<Note>, DomainError> {
    Ok(Json(
        note_service::update_note(state.db(), &principal, id, input).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/notes/{id}",
    params(("id" = i32, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_note(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    note_service::delete_note(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
