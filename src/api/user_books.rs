use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::domain::{DomainError, Principal};
use crate::infrastructure::AppState;
use crate::models::UserBook;
use crate::services::user_book_service::{
    self, CreateUserBookInput, ProgressUpdate, ReadingStatistics, UpdateUserBookInput,
    UserBookFilter,
};

#[derive(Debug, Deserialize)]
pub struct ListUserBooksQuery {
    pub status: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/userbooks",
    params(("status" = Option<String>, Query, description = "want_to_read, reading or read")),
    responses((status = 200, description = "The caller's tracked books", body = [UserBook])),
    security(("bearer" = []))
)]
pub async fn list_user_books(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListUserBooksQuery>,
) -> Result<Json<Vec<UserBook>>, DomainError> {
    let filter = UserBookFilter {
        status: query.status,
    };
    let user_books = user_book_service::list_user_books(state.db(), &principal, filter).await?;
    Ok(Json(user_books))
}

#[utoipa::path(
    post,
    path = "/api/v1/userbooks",
    responses(
        (status = 201, description = "Book tracked", body = UserBook),
        (status = 400, description = "Invalid field or book already tracked")
    ),
    security(("bearer" = []))
)]
pub async fn create_user_book(
    State(state): State<AppState>,
    principal: Principal,
    Json(input): Json<CreateUserBookInput>,
) -> Result<impl IntoResponse, DomainError> {
    let user_book = user_book_service::create_user_book(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(user_book)))
}

#[utoipa::path(
    get,
    path = "/api/v1/userbooks/{id}",
    params(("id" = i32, Path, description = "UserBook id")),
    responses(
        (status = 200, description = "Tracked book", body = UserBook),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_user_book(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<UserBook>, DomainError> {
    let user_book = user_book_service::get_user_book(state.db(), &principal, id).await?;
    Ok(Json(user_book))
}

#[utoipa::path(
    put,
    path = "/api/v1/userbooks/{id}",
    params(("id" = i32, Path, description = "UserBook id")),
    responses(
        (status = 200, description = "Tracked book updated", body = UserBook),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_user_book(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(input): Json<UpdateUserBookInput>,
) -> Result<Json<UserBook>, DomainError> {
    let user_book = user_book_service::update_user_book(state.db(), &principal, id, input).await?;
    Ok(Json(user_book))
}

#[utoipa::path(
    delete,
    path = "/api/v1/userbooks/{id}",
    params(("id" = i32, Path, description = "UserBook id")),
    responses(
        (status = 204, description = "Tracked book and its children deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_user_book(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    user_book_service::delete_user_book(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/userbooks/{id}/update_progress",
    params(("id" = i32, Path, description = "UserBook id")),
    responses(
        (status = 200, description = "Progress recorded, session created when valid", body = UserBook),
        (status = 400, description = "Negative page"),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_progress(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(input): Json<ProgressUpdate>,
) -> Result<Json<UserBook>, DomainError> {
    let user_book = user_book_service::update_progress(state.db(), &principal, id, input).await?;
    Ok(Json(user_book))
}

#[utoipa::path(
    get,
    path = "/api/v1/userbooks/statistics",
    responses((status = 200, description = "Aggregates over the caller's tracked books", body = ReadingStatistics)),
    security(("bearer" = []))
)]
pub async fn statistics(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ReadingStatistics>, DomainError> {
    let stats = user_book_service::statistics(state.db(), &principal).await?;
    Ok(Json(stats))
}
