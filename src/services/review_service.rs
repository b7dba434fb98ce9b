//! Review Service
//!
//! Reviews are owner-scoped like every other UserBook child, except that
//! listings also include other readers' public reviews.
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    JoinType, ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Deserialize;
use std::collections::HashMap;

use super::{ownership, user_book_service};
use crate::domain::{DomainError, Operation, Principal, Resource, ensure};
use crate::models::review::{self, Entity as ReviewEntity};
use crate::models::{Review, user, user_book};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewInput {
    pub user_book: i32,
    pub content: String,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReviewInput {
    pub content: Option<String>,
    pub is_public: Option<bool>,
}

/// Author usernames keyed by UserBook id
async fn authors_of<C: ConnectionTrait>(
    db: &C,
    user_book_ids: Vec<i32>,
) -> Result<HashMap<i32, String>, DomainError> {
    let rows = user_book::Entity::find()
        .filter(user_book::Column::Id.is_in(user_book_ids))
        .find_also_related(user::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(ub, author)| author.map(|u| (ub.id, u.username)))
        .collect())
}

async fn with_author<C: ConnectionTrait>(
    db: &C,
    model: review::Model,
) -> Result<Review, DomainError> {
    let mut authors = authors_of(db, vec![model.user_book_id]).await?;
    let username = authors.remove(&model.user_book_id).unwrap_or_default();
    Ok(Review::new(model, username))
}

async fn find_owned(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    operation: Operation,
) -> Result<review::Model, DomainError> {
    let model = ReviewEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;
    let owner_id = ownership::child_owner(db, model.user_book_id).await?;
    ensure(
        principal,
        &Resource::Review {
            owner_id,
            is_public: model.is_public,
        },
        operation,
    )?;
    Ok(model)
}

/// The principal's own reviews plus every public one, newest first
pub async fn list_reviews(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<Review>, DomainError> {
    let reviews = ReviewEntity::find()
        .join(JoinType::InnerJoin, review::Relation::UserBook.def())
        .filter(
            Condition::any()
                .add(user_book::Column::UserId.eq(principal.user_id))
                .add(review::Column::IsPublic.eq(true)),
        )
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id)
        .all(db)
        .await?;

    let mut ids: Vec<i32> = reviews.iter().map(|r| r.user_book_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let authors = authors_of(db, ids).await?;

    Ok(reviews
        .into_iter()
        .map(|r| {
            let username = authors.get(&r.user_book_id).cloned().unwrap_or_default();
            Review::new(r, username)
        })
        .collect())
}

pub async fn get_review(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<Review, DomainError> {
    let model = find_owned(db, principal, id, Operation::Read).await?;
    with_author(db, model).await
}

pub async fn create_review(
    db: &DatabaseConnection,
    principal: &Principal,
    input: CreateReviewInput,
) -> Result<Review, DomainError> {
    super::note_service::validate_content(&input.content)?;
    let parent =
        user_book_service::find_owned(db, principal, input.user_book, Operation::Update).await?;

    let now = chrono::Utc::now().to_rfc3339();
    let model = review::ActiveModel {
        user_book_id: Set(parent.id),
        content: Set(input.content),
        is_public: Set(input.is_public),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(
        user_id = principal.user_id,
        review_id = model.id,
        public = model.is_public,
        "Review created"
    );
    Ok(Review::new(model, principal.username.clone()))
}

pub async fn update_review(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: UpdateReviewInput,
) -> Result<Review, DomainError> {
    let model = find_owned(db, principal, id, Operation::Update).await?;
    let mut active: review::ActiveModel = model.into();

    if let Some(content) = input.content {
        super::note_service::validate_content(&content)?;
        active.content = Set(content);
    }
    if let Some(is_public) = input.is_public {
        active.is_public = Set(is_public);
    }
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let model = active.update(db).await?;
    Ok(Review::new(model, principal.username.clone()))
}

pub async fn delete_review(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let model = find_owned(db, principal, id, Operation::Delete).await?;
    model.delete(db).await?;
    Ok(())
}
