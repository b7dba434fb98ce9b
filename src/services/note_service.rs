//! Note Service
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Deserialize;

use super::{ownership, user_book_service};
use crate::domain::{DomainError, Operation, Principal, Resource, ensure};
use crate::models::note::{self, Entity as NoteEntity};
use crate::models::{Note, double_option, user_book};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteInput {
    pub user_book: i32,
    pub content: String,
    #[serde(default)]
    pub page_number: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteInput {
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub page_number: Option<Option<i32>>,
}

pub(crate) fn validate_content(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::validation(
            "content",
            "This field may not be blank.",
        ));
    }
    Ok(())
}

async fn find_owned(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    operation: Operation,
) -> Result<note::Model, DomainError> {
    let model = NoteEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;
    let owner_id = ownership::child_owner(db, model.user_book_id).await?;
    ensure(principal, &Resource::Note { owner_id }, operation)?;
    Ok(model)
}

pub async fn list_notes(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<Note>, DomainError> {
    let notes = NoteEntity::find()
        .join(JoinType::InnerJoin, note::Relation::UserBook.def())
        .filter(user_book::Column::UserId.eq(principal.user_id))
        .order_by_desc(note::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(notes.into_iter().map(Note::from).collect())
}

pub async fn get_note(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<Note, DomainError> {
    find_owned(db, principal, id, Operation::Read)
        .await
        .map(Note::from)
}

pub async fn create_note(
    db: &DatabaseConnection,
    principal: &Principal,
    input: CreateNoteInput,
) -> Result<Note, DomainError> {
    validate_content(&input.content)?;
    let parent =
        user_book_service::find_owned(db, principal, input.user_book, Operation::Update).await?;

    let now = chrono::Utc::now().to_rfc3339();
    let model = note::ActiveModel {
        user_book_id: Set(parent.id),
        content: Set(input.content),
        page_number: Set(input.page_number),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(Note::from(model))
}

pub async fn update_note(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: UpdateNoteInput,
) -> Result<Note, DomainError> {
    let model = find_owned(db, principal, id, Operation::Update).await?;
    let mut active: note::ActiveModel = model.into();

    if let Some(content) = input.content {
        validate_content(&content)?;
        active.content = Set(content);
    }
    if let Some(page_number) = input.page_number {
        active.page_number = Set(page_number);
    }
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let model = active.update(db).await?;
    Ok(Note::from(model))
}

pub async fn delete_note(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    find_owned(db, principal, id, Operation::Delete)
        .await?
        .delete(db)
        .await?;
    Ok(())
}
