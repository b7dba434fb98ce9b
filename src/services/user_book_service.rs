//! UserBook Service - a user's tracked books, reading progress and statistics
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use super::ownership;
use super::reading_session_service::{self, SessionFields};
use crate::domain::{DomainError, Operation, Principal, Resource, ensure};
use crate::models::user_book::{self, Entity as UserBookEntity};
use crate::models::{Book, ReadingStatus, Shelf, UserBook, book, double_option, shelf, user_book_shelf};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserBookInput {
    pub book: i32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_page: Option<i32>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub shelf_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserBookInput {
    pub status: Option<String>,
    pub current_page: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub rating: Option<Option<i32>>,
    /// Replaces the whole shelf set when present
    pub shelf_ids: Option<Vec<i32>>,
}

/// Body of `update_progress`. Times stay raw strings so that a malformed
/// session never fails the page update itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressUpdate {
    pub current_page: Option<i32>,
    #[serde(default)]
    pub create_session: bool,
    pub start_page: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct UserBookFilter {
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReadingStatistics {
    pub total_books: u64,
    pub books_by_status: Vec<StatusCount>,
    /// Absent (null) when no tracked book has a rating
    pub average_rating: Option<f64>,
    pub currently_reading: u64,
}

fn parse_status(status: &str) -> Result<ReadingStatus, DomainError> {
    status
        .parse::<ReadingStatus>()
        .map_err(|msg| DomainError::validation("status", msg))
}

fn validate_rating(rating: Option<i32>) -> Result<(), DomainError> {
    match rating {
        Some(r) if !(1..=5).contains(&r) => Err(DomainError::validation(
            "rating",
            "Ensure this value is between 1 and 5.",
        )),
        _ => Ok(()),
    }
}

fn validate_current_page(page: i32) -> Result<(), DomainError> {
    if page < 0 {
        return Err(DomainError::validation(
            "current_page",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    Ok(())
}

/// Load a UserBook the principal may act on, or NotFound
pub(crate) async fn find_owned<C: ConnectionTrait>(
    db: &C,
    principal: &Principal,
    id: i32,
    operation: Operation,
) -> Result<user_book::Model, DomainError> {
    let model = UserBookEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;
    ensure(
        principal,
        &Resource::UserBook {
            owner_id: model.user_id,
        },
        operation,
    )?;
    Ok(model)
}

/// Inline books and shelves, two queries regardless of the row count
pub async fn to_dtos<C: ConnectionTrait>(
    db: &C,
    models: Vec<user_book::Model>,
) -> Result<Vec<UserBook>, DomainError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let book_ids: Vec<i32> = models.iter().map(|m| m.book_id).collect();
    let books: HashMap<i32, Book> = book::Entity::find()
        .filter(book::Column::Id.is_in(book_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.id, Book::from(b)))
        .collect();

    let user_book_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let links = user_book_shelf::Entity::find()
        .filter(user_book_shelf::Column::UserBookId.is_in(user_book_ids))
        .find_also_related(shelf::Entity)
        .order_by_asc(shelf::Column::Name)
        .all(db)
        .await?;

    let mut shelves: HashMap<i32, Vec<Shelf>> = HashMap::new();
    for (link, shelf) in links {
        if let Some(shelf) = shelf {
            shelves
                .entry(link.user_book_id)
                .or_default()
                .push(Shelf::from(shelf));
        }
    }

    models
        .into_iter()
        .map(|model| {
            let book = books.get(&model.book_id).cloned().ok_or_else(|| {
                DomainError::Internal(format!("user_book {} has no book", model.id))
            })?;
            let shelves = shelves.remove(&model.id).unwrap_or_default();
            Ok(UserBook::new(model, book, shelves))
        })
        .collect()
}

pub async fn to_dto<C: ConnectionTrait>(
    db: &C,
    model: user_book::Model,
) -> Result<UserBook, DomainError> {
    to_dtos(db, vec![model])
        .await?
        .pop()
        .ok_or_else(|| DomainError::Internal("user_book vanished while loading".to_string()))
}

/// Swap the shelf set of a UserBook for the caller-owned subset of `shelf_ids`
async fn replace_shelves<C: ConnectionTrait>(
    db: &C,
    principal: &Principal,
    user_book_id: i32,
    shelf_ids: &[i32],
) -> Result<(), DomainError> {
    let owned = ownership::owned_shelf_ids(db, principal, shelf_ids).await?;

    user_book_shelf::Entity::delete_many()
        .filter(user_book_shelf::Column::UserBookId.eq(user_book_id))
        .exec(db)
        .await?;

    for shelf_id in owned {
        user_book_shelf::ActiveModel {
            user_book_id: Set(user_book_id),
            shelf_id: Set(shelf_id),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// List the principal's UserBooks, optionally by status
pub async fn list_user_books(
    db: &DatabaseConnection,
    principal: &Principal,
    filter: UserBookFilter,
) -> Result<Vec<UserBook>, DomainError> {
    let mut query = UserBookEntity::find().filter(user_book::Column::UserId.eq(principal.user_id));

    if let Some(status) = &filter.status
        && !status.is_empty()
    {
        let status = parse_status(status)?;
        query = query.filter(user_book::Column::Status.eq(status.as_str()));
    }

    let models = query
        .order_by_desc(user_book::Column::UpdatedAt)
        .all(db)
        .await?;

    to_dtos(db, models).await
}

pub async fn get_user_book(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<UserBook, DomainError> {
    let model = find_owned(db, principal, id, Operation::Read).await?;
    to_dto(db, model).await
}

/// Start tracking a book. Shelves not owned by the caller are dropped.
pub async fn create_user_book(
    db: &DatabaseConnection,
    principal: &Principal,
    input: CreateUserBookInput,
) -> Result<UserBook, DomainError> {
    let status = match input.status.as_deref() {
        Some(s) => parse_status(s)?,
        None => ReadingStatus::WantToRead,
    };
    validate_rating(input.rating)?;
    let current_page = input.current_page.unwrap_or(0);
    validate_current_page(current_page)?;

    if book::Entity::find_by_id(input.book).one(db).await?.is_none() {
        return Err(DomainError::validation(
            "book",
            format!("Invalid pk \"{}\" - object does not exist.", input.book),
        ));
    }

    let already_tracked = UserBookEntity::find()
        .filter(user_book::Column::UserId.eq(principal.user_id))
        .filter(user_book::Column::BookId.eq(input.book))
        .one(db)
        .await?;
    if already_tracked.is_some() {
        return Err(DomainError::conflict(
            "book",
            "This book is already in your collection.",
        ));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let txn = db.begin().await?;

    let model = user_book::ActiveModel {
        user_id: Set(principal.user_id),
        book_id: Set(input.book),
        status: Set(status.as_str().to_string()),
        current_page: Set(current_page),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        rating: Set(input.rating),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if !input.shelf_ids.is_empty() {
        replace_shelves(&txn, principal, model.id, &input.shelf_ids).await?;
    }

    let dto = to_dto(&txn, model).await?;
    txn.commit().await?;

    tracing::info!(
        user_id = principal.user_id,
        user_book_id = dto.id,
        book_id = dto.book,
        "Book added to collection"
    );
    Ok(dto)
}

pub async fn update_user_book(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: UpdateUserBookInput,
) -> Result<UserBook, DomainError> {
    let model = find_owned(db, principal, id, Operation::Update).await?;
    let mut active: user_book::ActiveModel = model.into();

    if let Some(status) = &input.status {
        active.status = Set(parse_status(status)?.as_str().to_string());
    }
    if let Some(page) = input.current_page {
        validate_current_page(page)?;
        active.current_page = Set(page);
    }
    if let Some(start_date) = input.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = input.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(rating) = input.rating {
        validate_rating(rating)?;
        active.rating = Set(rating);
    }
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let txn = db.begin().await?;
    let model = active.update(&txn).await?;
    if let Some(shelf_ids) = &input.shelf_ids {
        replace_shelves(&txn, principal, model.id, shelf_ids).await?;
    }
    let dto = to_dto(&txn, model).await?;
    txn.commit().await?;

    Ok(dto)
}

/// Stop tracking a book; sessions, notes, reviews and quotes go with it
pub async fn delete_user_book(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let model = find_owned(db, principal, id, Operation::Delete).await?;
    UserBookEntity::delete_by_id(model.id).exec(db).await?;

    tracing::info!(user_id = principal.user_id, user_book_id = id, "UserBook deleted");
    Ok(())
}

/// Record reading progress.
///
/// The page update is committed on its own. When `create_session` is set a
/// ReadingSession spanning the previous page to the new one is attempted;
/// an invalid session is skipped without failing the request.
pub async fn update_progress(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: ProgressUpdate,
) -> Result<UserBook, DomainError> {
    let model = find_owned(db, principal, id, Operation::Update).await?;

    let Some(current_page) = input.current_page else {
        return to_dto(db, model).await;
    };
    validate_current_page(current_page)?;

    let previous_page = model.current_page;
    let mut active: user_book::ActiveModel = model.into();
    active.current_page = Set(current_page);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    let model = active.update(db).await?;

    tracing::debug!(
        user_book_id = id,
        from = previous_page,
        to = current_page,
        "Progress updated"
    );

    if input.create_session {
        let fields = SessionFields {
            start_page: input.start_page.unwrap_or(previous_page),
            end_page: current_page,
            start_time: input.start_time.as_deref().and_then(parse_instant),
            end_time: input.end_time.as_deref().and_then(parse_instant),
            notes: input.notes.unwrap_or_default(),
        };

        match reading_session_service::insert_session(db, model.id, fields).await {
            Ok(session) => tracing::info!(
                user_book_id = id,
                session_id = session.id,
                "Reading session recorded"
            ),
            Err(DomainError::Validation { field, message }) => tracing::debug!(
                user_book_id = id,
                %field,
                %message,
                "Reading session skipped"
            ),
            Err(e) => tracing::warn!(user_book_id = id, "Reading session not stored: {}", e),
        }
    }

    to_dto(db, model).await
}

fn parse_instant(raw: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

/// Aggregate the principal's collection. Runs inside one transaction so all
/// figures describe the same snapshot.
pub async fn statistics(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<ReadingStatistics, DomainError> {
    let scope =
        || UserBookEntity::find().filter(user_book::Column::UserId.eq(principal.user_id));

    let txn = db.begin().await?;

    let total_books = scope().count(&txn).await?;

    let by_status: Vec<(String, i64)> = scope()
        .select_only()
        .column(user_book::Column::Status)
        .column_as(
            SimpleExpr::from(Func::count(Expr::col(user_book::Column::Id))),
            "count",
        )
        .group_by(user_book::Column::Status)
        .order_by_asc(user_book::Column::Status)
        .into_tuple()
        .all(&txn)
        .await?;

    let average_rating: Option<f64> = scope()
        .select_only()
        .column_as(
            SimpleExpr::from(Func::avg(Expr::col(user_book::Column::Rating))),
            "average_rating",
        )
        .filter(user_book::Column::Rating.is_not_null())
        .into_tuple::<Option<f64>>()
        .one(&txn)
        .await?
        .flatten();

    txn.commit().await?;

    let books_by_status: Vec<StatusCount> = by_status
        .into_iter()
        .map(|(status, count)| StatusCount {
            status,
            count: count as u64,
        })
        .collect();

    let currently_reading = books_by_status
        .iter()
        .find(|s| s.status == ReadingStatus::Reading.as_str())
        .map(|s| s.count)
        .unwrap_or(0);

    Ok(ReadingStatistics {
        total_books,
        books_by_status,
        average_rating,
        currently_reading,
    })
}
