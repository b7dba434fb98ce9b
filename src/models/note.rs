use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_book_id: i32,
    pub content: String,
    pub page_number: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_book::Entity",
        from = "Column::UserBookId",
        to = "super::user_book::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    UserBook,
}

impl Related<super::user_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserBook.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Note {
    pub id: i32,
    pub user_book: i32,
    pub content: String,
    pub page_number: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Model> for Note {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_book: model.user_book_id,
            content: model.content,
            page_number: model.page_number,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
