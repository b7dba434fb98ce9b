//! Book Service - shared catalog records
//!
//! Books are global: any authenticated principal may read or write them.
//! Rows are keyed by `google_books_id`, and every write path coming from the
//! catalog goes through [`create_or_update_book`] so that a volume is stored
//! at most once.
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;

use super::user_book_service::{self, CreateUserBookInput};
use crate::domain::{BookDraft, CatalogLookup, DomainError, Operation, Principal, Resource, ensure};
use crate::google_books::MAX_RESULTS_LIMIT;
use crate::models::book::{self, ActiveModel as BookActiveModel, Entity as BookEntity, encode_list};
use crate::models::{Book, UserBook, double_option};

pub const DEFAULT_MAX_RESULTS: u32 = 10;

const LIKE_ESCAPE: char = '!';

// Matches when any element of the JSON `authors` array contains the pattern
const AUTHOR_MATCH_SQL: &str = r#"EXISTS (SELECT 1 FROM json_each(CASE WHEN json_valid("books"."authors") THEN "books"."authors" ELSE '[]' END) WHERE json_each.value LIKE ? ESCAPE '!')"#;

/// `%term%` with LIKE wildcards in the term taken literally (escape char `!`)
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Partial update of a Book. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookInput {
    pub google_books_id: Option<String>,
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub published_date: Option<Option<String>>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub page_count: Option<Option<i32>>,
    pub categories: Option<Vec<String>>,
    pub thumbnail_url: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddToCollectionInput {
    pub status: Option<String>,
    #[serde(default)]
    pub shelf_ids: Vec<i32>,
}

async fn find_book(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    operation: Operation,
) -> Result<book::Model, DomainError> {
    let model = BookEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;
    ensure(principal, &Resource::Book, operation)?;
    Ok(model)
}

/// List books, optionally narrowed to a title or author substring
pub async fn list_books(
    db: &DatabaseConnection,
    search: Option<&str>,
) -> Result<Vec<Book>, DomainError> {
    let mut query = BookEntity::find();

    if let Some(term) = search.map(str::trim)
        && !term.is_empty()
    {
        tracing::debug!("List books - search={}", term);
        let pattern = contains_pattern(term);
        query = query.filter(
            Condition::any()
                .add(
                    Expr::col((BookEntity, book::Column::Title))
                        .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
                )
                .add(Expr::cust_with_values(AUTHOR_MATCH_SQL, [pattern])),
        );
    }

    let books = query.order_by_asc(book::Column::Title).all(db).await?;
    Ok(books.into_iter().map(Book::from).collect())
}

pub async fn get_book(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<Book, DomainError> {
    find_book(db, principal, id, Operation::Read)
        .await
        .map(Book::from)
}

/// Upsert by `google_books_id`. The flag is true when a new row was inserted.
pub async fn create_or_update_book(
    db: &DatabaseConnection,
    draft: BookDraft,
) -> Result<(Book, bool), DomainError> {
    draft.validate()?;
    let now = chrono::Utc::now().to_rfc3339();

    let txn = db.begin().await?;
    let existing = BookEntity::find()
        .filter(book::Column::GoogleBooksId.eq(&draft.google_books_id))
        .one(&txn)
        .await?;

    let (model, created) = match existing {
        Some(model) => {
            let mut active: BookActiveModel = model.into();
            active.apply_draft(draft);
            active.updated_at = Set(now);
            (active.update(&txn).await?, false)
        }
        None => {
            let mut active = BookActiveModel {
                created_at: Set(now.clone()),
                updated_at: Set(now),
                ..Default::default()
            };
            active.apply_draft(draft);
            (active.insert(&txn).await?, true)
        }
    };
    txn.commit().await?;

    tracing::info!(
        book_id = model.id,
        google_books_id = %model.google_books_id,
        created,
        "Book stored"
    );
    Ok((Book::from(model), created))
}

pub async fn update_book(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: UpdateBookInput,
) -> Result<Book, DomainError> {
    let model = find_book(db, principal, id, Operation::Update).await?;

    if let Some(external_id) = &input.google_books_id {
        if external_id.trim().is_empty() {
            return Err(DomainError::validation(
                "google_books_id",
                "This field may not be blank.",
            ));
        }
        let holder = BookEntity::find()
            .filter(book::Column::GoogleBooksId.eq(external_id))
            .filter(book::Column::Id.ne(id))
            .one(db)
            .await?;
        if holder.is_some() {
            return Err(DomainError::conflict(
                "google_books_id",
                "book with this google books id already exists.",
            ));
        }
    }

    let mut active: BookActiveModel = model.into();
    if let Some(external_id) = input.google_books_id {
        active.google_books_id = Set(external_id);
    }
    if let Some(title) = input.title {
        if title.trim().is_empty() {
            return Err(DomainError::validation("title", "This field may not be blank."));
        }
        active.title = Set(title);
    }
    if let Some(authors) = input.authors {
        active.authors = Set(encode_list(&authors));
    }
    if let Some(published_date) = input.published_date {
        active.published_date = Set(published_date);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(page_count) = input.page_count {
        if page_count.is_some_and(|p| p < 0) {
            return Err(DomainError::validation(
                "page_count",
                "Ensure this value is greater than or equal to 0.",
            ));
        }
        active.page_count = Set(page_count);
    }
    if let Some(categories) = input.categories {
        active.categories = Set(encode_list(&categories));
    }
    if let Some(thumbnail_url) = input.thumbnail_url {
        active.thumbnail_url = Set(thumbnail_url);
    }
    if let Some(language) = input.language {
        active.language = Set(language);
    }
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let model = active.update(db).await?;
    Ok(Book::from(model))
}

/// Delete a book together with every UserBook tracking it
pub async fn delete_book(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let model = find_book(db, principal, id, Operation::Delete).await?;
    model.delete(db).await?;

    tracing::info!(book_id = id, user_id = principal.user_id, "Book deleted");
    Ok(())
}

/// Parse the `max_results` query value: default 10, clamped to the upstream bound
pub fn parse_max_results(raw: Option<&str>) -> Result<u32, DomainError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_MAX_RESULTS),
        Some(value) => value
            .parse::<i64>()
            .map(|n| n.clamp(1, MAX_RESULTS_LIMIT as i64) as u32)
            .map_err(|_| DomainError::validation("max_results", "A valid integer is required.")),
    }
}

/// Catalog search. Nothing is persisted.
pub async fn search_catalog(
    catalog: &dyn CatalogLookup,
    query: Option<&str>,
    max_results: Option<&str>,
) -> Result<Vec<BookDraft>, DomainError> {
    let query = match query.map(str::trim) {
        Some(q) if !q.is_empty() => q,
        _ => {
            return Err(DomainError::validation(
                "error",
                "Search query is required",
            ));
        }
    };
    let max_results = parse_max_results(max_results)?;

    Ok(catalog.search(query, max_results).await)
}

/// Fetch a volume from the catalog and upsert it
pub async fn import_from_catalog(
    db: &DatabaseConnection,
    catalog: &dyn CatalogLookup,
    google_books_id: &str,
) -> Result<(Book, bool), DomainError> {
    let draft = catalog.fetch(google_books_id).await?;
    create_or_update_book(db, draft).await
}

/// Start tracking an existing book for the principal
pub async fn add_to_collection(
    db: &DatabaseConnection,
    principal: &Principal,
    book_id: i32,
    input: AddToCollectionInput,
) -> Result<UserBook, DomainError> {
    let book = find_book(db, principal, book_id, Operation::Read).await?;

    user_book_service::create_user_book(
        db,
        principal,
        CreateUserBookInput {
            book: book.id,
            status: input.status,
            current_page: None,
            start_date: None,
            end_date: None,
            rating: None,
            shelf_ids: input.shelf_ids,
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_results_defaults_and_clamps() {
        assert_eq!(parse_max_results(None).unwrap(), 10);
        assert_eq!(parse_max_results(Some("")).unwrap(), 10);
        assert_eq!(parse_max_results(Some("5")).unwrap(), 5);
        assert_eq!(parse_max_results(Some("0")).unwrap(), 1);
        assert_eq!(parse_max_results(Some("-3")).unwrap(), 1);
        assert_eq!(parse_max_results(Some("400")).unwrap(), 40);
    }

    #[test]
    fn max_results_must_be_an_integer() {
        let err = parse_max_results(Some("ten")).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "max_results"));
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("dune"), "%dune%");
        assert_eq!(contains_pattern("100%"), "%100!%%");
        assert_eq!(contains_pattern("a_b!c"), "%a!_b!!c%");
        assert_eq!(contains_pattern("a\\b"), "%a\\b%");
    }
}
