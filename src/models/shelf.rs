use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shelves")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub user_id: i32,
    pub is_default: bool,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::user_book_shelf::Entity")]
    UserBookShelf,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::user_book::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_book_shelf::Relation::UserBook.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_book_shelf::Relation::Shelf.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Shelf {
    pub id: i32,
    pub name: String,
    pub user: i32,
    pub is_default: bool,
    pub created_at: String,
}

impl From<Model> for Shelf {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            user: model.user_id,
            is_default: model.is_default,
            created_at: model.created_at,
        }
    }
}
