use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::domain::{DomainError, Principal};
use crate::infrastructure::AppState;
use crate::models::Review;
use crate::services::review_service::{self, CreateReviewInput, UpdateReviewInput};

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    responses((status = 200, description = "The caller's reviews and all public ones, newest first", body = [Review])),
    security(("bearer" = []))
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<Review>>, DomainError> {
    Ok(Json(review_service::list_reviews(state.db(), &principal).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 404, description = "UserBook not found")
    ),
    security(("bearer" = []))
)]
pub async fn create_review(
    State(state): State<AppState>,
    principal: Principal,
    Json(input): Json<CreateReviewInput>,
) -> Result<impl IntoResponse, DomainError> {
    let review = review_service::create_review(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    params(("id" = i32, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review", body = Review),
        (status = 404, description = "Not found, or another reader's review")
    ),
    security(("bearer" = []))
)]
pub async fn get_review(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<Review>, DomainError> {
    Ok(Json(review_service::get_review(state.db(), &principal, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    params(("id" = i32, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_review(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(input): Json<UpdateReviewInput>,
) -> Result<Json<Review>, DomainError> {
    Ok(Json(
        review_service::update_review(state.db(), &principal, id, input).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    params(("id" = i32, Path, description = "Review id")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_review(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    review_service::delete_review(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
