use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::domain::{DomainError, Principal};
use crate::infrastructure::AppState;
use crate::models::Quote;
use crate::services::quote_service::{self, CreateQuoteInput, UpdateQuoteInput};

#[utoipa::path(
    get,
    path = "/api/v1/quotes",
    responses((status = 200, description = "The caller's quotes", body = [Quote])),
    security(("bearer" = []))
)]
pub async fn list_quotes(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<Quote>>, DomainError> {
    Ok(Json(quote_service::list_quotes(state.db(), &principal).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/quotes",
    responses(
        (status = 201, description = "Quote saved", body = Quote),
        (status = 404, description = "UserBook not found")
    ),
    security(("bearer" = []))
)]
pub async fn create_quote(
    State(state): State<AppState>,
    principal: Principal,
    Json(input): Json<CreateQuoteInput>,
) -> Result<impl IntoResponse, DomainError> {
    let quote = quote_service::create_quote(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

#[utoipa::path(
    get,
    path = "/api/v1/quotes/{id}",
    params(("id" = i32, Path, description = "Quote id")),
    responses(
        (status = 200, description = "Quote", body = Quote),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_quote(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<Quote>, DomainError> {
    Ok(Json(quote_service::get_quote(state.db(), &principal, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/quotes/{id}",
    params(("id" = i32, Path, description = "Quote id")),
    responses(
        (status = 200, description = "Quote updated", body = Quote),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_quote(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(input): Json<UpdateQuoteInput>,
) -> Result<Json<Quote>, DomainError> {
    Ok(Json(
        quote_service::update_quote(state.db(), &principal, id, input).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/quotes/{id}",
    params(("id" = i32, Path, description = "Quote id")),
    responses(
        (status = 204, description = "Quote deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_quote(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    quote_service::delete_quote(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
