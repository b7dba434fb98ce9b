//! Ownership resolution, one function per entity family
//!
//! Shelves and UserBooks are owned directly. Sessions, notes, reviews and
//! quotes are owned through their parent UserBook, so their resolvers
//! compose `user_book_owner` instead of walking relations implicitly.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};

use crate::domain::{DomainError, Principal};
use crate::models::{shelf, user_book};

/// Owner of a UserBook, `None` when the row does not exist
pub async fn user_book_owner<C: ConnectionTrait>(
    db: &C,
    user_book_id: i32,
) -> Result<Option<i32>, DomainError> {
    let owner = user_book::Entity::find_by_id(user_book_id)
        .select_only()
        .column(user_book::Column::UserId)
        .into_tuple::<i32>()
        .one(db)
        .await?;
    Ok(owner)
}

/// Owner of any UserBook child, resolved through its parent
pub async fn child_owner<C: ConnectionTrait>(
    db: &C,
    parent_user_book_id: i32,
) -> Result<i32, DomainError> {
    // A child cannot outlive its parent (ON DELETE CASCADE)
    user_book_owner(db, parent_user_book_id)
        .await?
        .ok_or_else(|| DomainError::Internal(format!("orphaned child of user_book {}", parent_user_book_id)))
}

/// The subset of `shelf_ids` that belongs to the principal.
/// Foreign or unknown ids are dropped silently.
pub async fn owned_shelf_ids<C: ConnectionTrait>(
    db: &C,
    principal: &Principal,
    shelf_ids: &[i32],
) -> Result<Vec<i32>, DomainError> {
    if shelf_ids.is_empty() {
        return Ok(Vec::new());
    }

    let owned: Vec<i32> = shelf::Entity::find()
        .select_only()
        .column(shelf::Column::Id)
        .filter(shelf::Column::Id.is_in(shelf_ids.iter().copied()))
        .filter(shelf::Column::UserId.eq(principal.user_id))
        .into_tuple()
        .all(db)
        .await?;

    if owned.len() < shelf_ids.len() {
        tracing::debug!(
            user_id = principal.user_id,
            requested = shelf_ids.len(),
            kept = owned.len(),
            "Dropped shelf ids not owned by caller"
        );
    }

    Ok(owned)
}
