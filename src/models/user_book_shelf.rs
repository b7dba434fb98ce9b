use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_book_shelves")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_book_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub shelf_id: i32,
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
    #[sea_orm(
        belongs_to = "super::shelf::Entity",
        from = "Column::ShelfId",
        to = "super::shelf::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Shelf,
}

impl Related<super::user_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserBook.def()
    }
}

impl Related<super::shelf::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shelf.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
