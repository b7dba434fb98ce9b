use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::domain::{DomainError, Principal};
use crate::infrastructure::AppState;
use crate::models::{Shelf, UserBook};
use crate::services::shelf_service::{self, CreateShelfInput, UpdateShelfInput};

#[utoipa::path(
    get,
    path = "/api/v1/shelves",
    responses((status = 200, description = "The caller's shelves", body = [Shelf])),
    security(("bearer" = []))
)]
pub async fn list_shelves(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<Shelf>>, DomainError> {
    Ok(Json(shelf_service::list_shelves(state.db(), &principal).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/shelves",
    responses(
        (status = 201, description = "Shelf created", body = Shelf),
        (status = 400, description = "Blank or duplicate name")
    ),
    security(("bearer" = []))
)]
pub async fn create_shelf(
    State(state): State<AppState>,
    principal: Principal,
    Json(input): Json<CreateShelfInput>,
) -> Result<impl IntoResponse, DomainError> {
    let shelf = shelf_service::create_shelf(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(shelf)))
}

#[utoipa::path(
    get,
    path = "/api/v1/shelves/{id}",
    params(("id" = i32, Path, description = "Shelf id")),
    responses(
        (status = 200, description = "Shelf", body = Shelf),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_shelf(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<Shelf>, DomainError> {
    Ok(Json(shelf_service::get_shelf(state.db(), &principal, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/shelves/{id}",
    params(("id" = i32, Path, description = "Shelf id")),
    responses(
        (status = 200, description = "Shelf updated", body = Shelf),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_shelf(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(input): Json<UpdateShelfInput>,
) -> Result<Json<Shelf>, DomainError> {
    Ok(Json(
        shelf_service::update_shelf(state.db(), &principal, id, input).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/shelves/{id}",
    params(("id" = i32, Path, description = "Shelf id")),
    responses(
        (status = 204, description = "Shelf deleted, its books stay tracked"),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_shelf(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    shelf_service::delete_shelf(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/shelves/{id}/books",
    params(("id" = i32, Path, description = "Shelf id")),
    responses(
        (status = 200, description = "UserBooks on the shelf", body = [UserBook]),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn shelf_books(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<Vec<UserBook>>, DomainError> {
    Ok(Json(
        shelf_service::list_shelf_books(state.db(), &principal, id).await?,
    ))
}
