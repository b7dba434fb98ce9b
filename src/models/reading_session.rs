use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reading_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_book_id: i32,
    pub start_page: i32,
    pub end_page: i32,
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,
    pub notes: String,
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
pub struct ReadingSession {
    pub id: i32,
    pub user_book: i32,
    pub start_page: i32,
    pub end_page: i32,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub notes: String,
}

impl From<Model> for ReadingSession {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_book: model.user_book_id,
            start_page: model.start_page,
            end_page: model.end_page,
            start_time: model.start_time,
            end_time: model.end_time,
            notes: model.notes,
        }
    }
}
