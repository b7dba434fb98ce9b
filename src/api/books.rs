use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::domain::{BookDraft, DomainError, Principal};
use crate::infrastructure::AppState;
use crate::models::Book;
use crate::services::book_service::{self, AddToCollectionInput, UpdateBookInput};

#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogSearchQuery {
    pub q: Option<String>,
    /// Kept raw so a non-integer becomes a field error rather than a rejection
    pub max_results: Option<String>,
}

fn created_or_ok(created: bool) -> StatusCode {
    if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(("search" = Option<String>, Query, description = "Title or author substring")),
    responses((status = 200, description = "All books", body = [Book])),
    security(("bearer" = []))
)]
pub async fn list_books(
    State(state): State<AppState>,
    _principal: Principal,
    Query(query): Query<ListBooksQuery>,
) -> Result<Json<Vec<Book>>, DomainError> {
    let books = book_service::list_books(state.db(), query.search.as_deref()).await?;
    Ok(Json(books))
}

#[utoipa::path(
    post,
    path = "/api/v1/books",
    request_body = BookDraft,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 200, description = "Existing book updated", body = Book),
        (status = 400, description = "Invalid book")
    ),
    security(("bearer" = []))
)]
pub async fn create_book(
    State(state): State<AppState>,
    _principal: Principal,
    Json(draft): Json<BookDraft>,
) -> Result<impl IntoResponse, DomainError> {
    let (book, created) = book_service::create_or_update_book(state.db(), draft).await?;
    Ok((created_or_ok(created), Json(book)))
}

#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book", body = Book),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_book(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<Book>, DomainError> {
    let book = book_service::get_book(state.db(), &principal, id).await?;
    Ok(Json(book))
}

#[utoipa::path(
    put,
    path = "/api/v1/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid field or google_books_id taken"),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_book(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(input): Json<UpdateBookInput>,
) -> Result<Json<Book>, DomainError> {
    let book = book_service::update_book(state.db(), &principal, id, input).await?;
    Ok(Json(book))
}

#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_book(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    book_service::delete_book(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/books/search_google_books",
    params(
        ("q" = String, Query, description = "Search terms"),
        ("max_results" = Option<u32>, Query, description = "1 to 40, default 10")
    ),
    responses(
        (status = 200, description = "Catalog matches, not persisted", body = [BookDraft]),
        (status = 400, description = "Missing query")
    ),
    security(("bearer" = []))
)]
pub async fn search_google_books(
    State(state): State<AppState>,
    _principal: Principal,
    Query(query): Query<CatalogSearchQuery>,
) -> Result<Json<Vec<BookDraft>>, DomainError> {
    let drafts = book_service::search_catalog(
        state.catalog.as_ref(),
        query.q.as_deref(),
        query.max_results.as_deref(),
    )
    .await?;
    Ok(Json(drafts))
}

#[utoipa::path(
    post,
    path = "/api/v1/books/import/{google_books_id}",
    params(("google_books_id" = String, Path, description = "Google Books volume id")),
    responses(
        (status = 201, description = "Book imported", body = Book),
        (status = 200, description = "Existing book refreshed", body = Book),
        (status = 404, description = "Unknown volume"),
        (status = 502, description = "Catalog unavailable")
    ),
    security(("bearer" = []))
)]
pub async fn import_book(
    State(state): State<AppState>,
    _principal: Principal,
    Path(google_books_id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    let (book, created) =
        book_service::import_from_catalog(state.db(), state.catalog.as_ref(), &google_books_id)
            .await?;
    Ok((created_or_ok(created), Json(book)))
}

#[utoipa::path(
    post,
    path = "/api/v1/books/{id}/add_to_collection",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 201, description = "Book tracked", body = crate::models::UserBook),
        (status = 400, description = "Invalid status or already tracked"),
        (status = 404, description = "Not found")
    ),
    security(("bearer" = []))
)]
pub async fn add_to_collection(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    input: Option<Json<AddToCollectionInput>>,
) -> Result<impl IntoResponse, DomainError> {
    let input = input.map(|Json(input)| input).unwrap_or_default();
    let user_book = book_service::add_to_collection(state.db(), &principal, id, input).await?;
    Ok((StatusCode::CREATED, Json(user_book)))
}
