//! Quote Service
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Deserialize;

use super::note_service::validate_content;
use super::{ownership, user_book_service};
use crate::domain::{DomainError, Operation, Principal, Resource, ensure};
use crate::models::quote::{self, Entity as QuoteEntity};
use crate::models::{Quote, double_option, user_book};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuoteInput {
    pub user_book: i32,
    pub content: String,
    #[serde(default)]
    pub page_number: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuoteInput {
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub page_number: Option<Option<i32>>,
}

async fn find_owned(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    operation: Operation,
) -> Result<quote::Model, DomainError> {
    let model = QuoteEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;
    let owner_id = ownership::child_owner(db, model.user_book_id).await?;
    ensure(principal, &Resource::Quote { owner_id }, operation)?;
    Ok(model)
}

pub async fn list_quotes(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<Quote>, DomainError> {
    let quotes = QuoteEntity::find()
        .join(JoinType::InnerJoin, quote::Relation::UserBook.def())
        .filter(user_book::Column::UserId.eq(principal.user_id))
        .order_by_desc(quote::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(quotes.into_iter().map(Quote::from).collect())
}

pub async fn get_quote(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<Quote, DomainError> {
    let model = find_owned(db, principal, id, Operation::Read).await?;
    Ok(Quote::from(model))
}

pub async fn create_quote(
    db: &DatabaseConnection,
    principal: &Principal,
    input: CreateQuoteInput,
) -> Result<Quote, DomainError> {
    validate_content(&input.content)?;
    let parent =
        user_book_service::find_owned(db, principal, input.user_book, Operation::Update).await?;

    let model = quote::ActiveModel {
        user_book_id: Set(parent.id),
        content: Set(input.content),
        page_number: Set(input.page_number),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(Quote::from(model))
}

pub async fn update_quote(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: UpdateQuoteInput,
) -> Result<Quote, DomainError> {
    let model = find_owned(db, principal, id, Operation::Update).await?;
    let mut active: quote::ActiveModel = model.clone().into();

    if let Some(content) = input.content {
        validate_content(&content)?;
        active.content = Set(content);
    }
    if let Some(page_number) = input.page_number {
        active.page_number = Set(page_number);
    }

    // Quotes carry no updated_at, so an empty patch is a no-op
    if !active.is_changed() {
        return Ok(Quote::from(model));
    }

    let model = active.update(db).await?;
    Ok(Quote::from(model))
}

pub async fn delete_quote(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let model = find_owned(db, principal, id, Operation::Delete).await?;
    model.delete(db).await?;
    Ok(())
}
