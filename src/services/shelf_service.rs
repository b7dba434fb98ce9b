//! Shelf Service - owner-scoped shelves and their books

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;

use super::user_book_service;
use crate::domain::{DomainError, Operation, Principal, Resource, ensure};
use crate::models::shelf::{self, Entity as ShelfEntity};
use crate::models::{Shelf, UserBook, user_book};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateShelfInput {
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShelfInput {
    pub name: Option<String>,
    pub is_default: Option<bool>,
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name", "This field may not be blank."));
    }
    if name.chars().count() > 100 {
        return Err(DomainError::validation(
            "name",
            "Ensure this field has no more than 100 characters.",
        ));
    }
    Ok(name.to_string())
}

async fn ensure_name_free(
    db: &DatabaseConnection,
    principal: &Principal,
    name: &str,
    except_id: Option<i32>,
) -> Result<(), DomainError> {
    let mut query = ShelfEntity::find()
        .filter(shelf::Column::UserId.eq(principal.user_id))
        .filter(shelf::Column::Name.eq(name));
    if let Some(id) = except_id {
        query = query.filter(shelf::Column::Id.ne(id));
    }

    if query.one(db).await?.is_some() {
        return Err(DomainError::conflict(
            "name",
            "You already have a shelf with this name.",
        ));
    }
    Ok(())
}

/// Load a shelf the principal may act on, or NotFound
async fn find_owned(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    operation: Operation,
) -> Result<shelf::Model, DomainError> {
    let model = ShelfEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;
    ensure(
        principal,
        &Resource::Shelf {
            owner_id: model.user_id,
        },
        operation,
    )?;
    Ok(model)
}

pub async fn list_shelves(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<Shelf>, DomainError> {
    let shelves = ShelfEntity::find()
        .filter(shelf::Column::UserId.eq(principal.user_id))
        .order_by_asc(shelf::Column::Name)
        .all(db)
        .await?;

    Ok(shelves.into_iter().map(Shelf::from).collect())
}

pub async fn get_shelf(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<Shelf, DomainError> {
    find_owned(db, principal, id, Operation::Read)
        .await
        .map(Shelf::from)
}

pub async fn create_shelf(
    db: &DatabaseConnection,
    principal: &Principal,
    input: CreateShelfInput,
) -> Result<Shelf, DomainError> {
    let name = validate_name(&input.name)?;
    ensure_name_free(db, principal, &name, None).await?;

    let model = shelf::ActiveModel {
        name: Set(name),
        user_id: Set(principal.user_id),
        is_default: Set(input.is_default),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(user_id = principal.user_id, shelf_id = model.id, "Shelf created");
    Ok(Shelf::from(model))
}

pub async fn update_shelf(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: UpdateShelfInput,
) -> Result<Shelf, DomainError> {
    let model = find_owned(db, principal, id, Operation::Update).await?;
    let mut active: shelf::ActiveModel = model.clone().into();

    if let Some(name) = input.name {
        let name = validate_name(&name)?;
        ensure_name_free(db, principal, &name, Some(id)).await?;
        active.name = Set(name);
    }
    if let Some(is_default) = input.is_default {
        active.is_default = Set(is_default);
    }

    if !active.is_changed() {
        return Ok(Shelf::from(model));
    }

    let model = active.update(db).await?;
    Ok(Shelf::from(model))
}

/// Deleting a shelf only drops its associations, never the UserBooks on it
pub async fn delete_shelf(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let model = find_owned(db, principal, id, Operation::Delete).await?;
    model.delete(db).await?;

    tracing::info!(user_id = principal.user_id, shelf_id = id, "Shelf deleted");
    Ok(())
}

/// UserBooks placed on a shelf
pub async fn list_shelf_books(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<Vec<UserBook>, DomainError> {
    let model = find_owned(db, principal, id, Operation::Read).await?;

    let user_books = model
        .find_related(user_book::Entity)
        .order_by_asc(user_book::Column::Id)
        .all(db)
        .await?;

    user_book_service::to_dtos(db, user_books).await
}
