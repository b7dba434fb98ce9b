//! ReadingSession Service - timed reading spans attached to a UserBook
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::entity::prelude::DateTimeUtc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Deserialize;

use super::ownership;
use crate::domain::{DomainError, Operation, Principal, Resource, ensure};
use crate::models::reading_session::{self, Entity as SessionEntity};
use crate::models::{ReadingSession, user_book};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionInput {
    pub user_book: i32,
    pub start_page: i32,
    pub end_page: i32,
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSessionInput {
    pub start_page: Option<i32>,
    pub end_page: Option<i32>,
    pub start_time: Option<DateTimeUtc>,
    pub end_time: Option<DateTimeUtc>,
    pub notes: Option<String>,
}

/// A session about to be stored. Times are optional here because progress
/// updates may carry none; a session without both times is invalid.
#[derive(Debug, Clone)]
pub struct SessionFields {
    pub start_page: i32,
    pub end_page: i32,
    pub start_time: Option<DateTimeUtc>,
    pub end_time: Option<DateTimeUtc>,
    pub notes: String,
}

/// Page and time ordering shared by every write path
pub fn validate_session(
    start_page: i32,
    end_page: i32,
    start_time: DateTimeUtc,
    end_time: DateTimeUtc,
) -> Result<(), DomainError> {
    if start_page < 0 {
        return Err(DomainError::validation(
            "start_page",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    if end_page < start_page {
        return Err(DomainError::validation(
            "end_page",
            "End page must be greater than or equal to start page.",
        ));
    }
    if end_time < start_time {
        return Err(DomainError::validation(
            "end_time",
            "End time must be after start time.",
        ));
    }
    Ok(())
}

/// Validate and store a session under an already-authorized UserBook
pub(crate) async fn insert_session<C: ConnectionTrait>(
    db: &C,
    user_book_id: i32,
    fields: SessionFields,
) -> Result<reading_session::Model, DomainError> {
    let start_time = fields
        .start_time
        .ok_or_else(|| DomainError::validation("start_time", "A valid start time is required."))?;
    let end_time = fields
        .end_time
        .ok_or_else(|| DomainError::validation("end_time", "A valid end time is required."))?;
    validate_session(fields.start_page, fields.end_page, start_time, end_time)?;

    let model = reading_session::ActiveModel {
        user_book_id: Set(user_book_id),
        start_page: Set(fields.start_page),
        end_page: Set(fields.end_page),
        start_time: Set(start_time),
        end_time: Set(end_time),
        notes: Set(fields.notes),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(model)
}

async fn find_owned(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    operation: Operation,
) -> Result<reading_session::Model, DomainError> {
    let model = SessionEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;
    let owner_id = ownership::child_owner(db, model.user_book_id).await?;
    ensure(principal, &Resource::ReadingSession { owner_id }, operation)?;
    Ok(model)
}

/// Sessions across all of the principal's UserBooks, most recent first
pub async fn list_sessions(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<ReadingSession>, DomainError> {
    let sessions = SessionEntity::find()
        .join(JoinType::InnerJoin, reading_session::Relation::UserBook.def())
        .filter(user_book::Column::UserId.eq(principal.user_id))
        .order_by_desc(reading_session::Column::StartTime)
        .all(db)
        .await?;

    Ok(sessions.into_iter().map(ReadingSession::from).collect())
}

pub async fn get_session(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<ReadingSession, DomainError> {
    find_owned(db, principal, id, Operation::Read)
        .await
        .map(ReadingSession::from)
}

pub async fn create_session(
    db: &DatabaseConnection,
    principal: &Principal,
    input: CreateSessionInput,
) -> Result<ReadingSession, DomainError> {
    let parent = super::user_book_service::find_owned(db, principal, input.user_book, Operation::Update)
        .await?;

    let model = insert_session(
        db,
        parent.id,
        SessionFields {
            start_page: input.start_page,
            end_page: input.end_page,
            start_time: Some(input.start_time),
            end_time: Some(input.end_time),
            notes: input.notes,
        },
    )
    .await?;

    tracing::info!(user_book_id = parent.id, session_id = model.id, "Reading session created");
    Ok(ReadingSession::from(model))
}

pub async fn update_session(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: UpdateSessionInput,
) -> Result<ReadingSession, DomainError> {
    let model = find_owned(db, principal, id, Operation::Update).await?;

    let start_page = input.start_page.unwrap_or(model.start_page);
    let end_page = input.end_page.unwrap_or(model.end_page);
    let start_time = input.start_time.unwrap_or(model.start_time);
    let end_time = input.end_time.unwrap_or(model.end_time);
    validate_session(start_page, end_page, start_time, end_time)?;

    let mut active: reading_session::ActiveModel = model.into();
    active.start_page = Set(start_page);
    active.end_page = Set(end_page);
    active.start_time = Set(start_time);
    active.end_time = Set(end_time);
    if let Some(notes) = input.notes {
        active.notes = Set(notes);
    }

    let model = active.update(db).await?;
    Ok(ReadingSession::from(model))
}

pub async fn delete_session(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let model = find_owned(db, principal, id, Operation::Delete).await?;
    model.delete(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn accepts_a_forward_session() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
        assert!(validate_session(50, 75, start, start + Duration::hours(1)).is_ok());
    }

    #[test]
    fn single_page_instant_session_is_valid() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
        assert!(validate_session(10, 10, at, at).is_ok());
    }

    #[test]
    fn rejects_backwards_pages() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
        let err = validate_session(75, 50, start, start + Duration::hours(1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "end_page"));
    }

    #[test]
    fn rejects_backwards_times() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
        let err = validate_session(50, 75, start, start - Duration::minutes(5)).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "end_time"));
    }
}
