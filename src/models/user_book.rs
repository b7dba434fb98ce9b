use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use std::fmt;
use std::str::FromStr;

use super::book::Book;
use super::shelf::Shelf;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    #[sea_orm(default_value = "want_to_read")]
    pub status: String,
    pub current_page: i32,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub rating: Option<i32>, // 1-5, NULL = not rated
    pub created_at: String,
    pub updated_at: String,
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
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Book,
    #[sea_orm(has_many = "super::reading_session::Entity")]
    ReadingSessions,
    #[sea_orm(has_many = "super::note::Entity")]
    Notes,
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::quote::Entity")]
    Quotes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::shelf::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_book_shelf::Relation::Shelf.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_book_shelf::Relation::UserBook.def().rev())
    }
}

impl Related<super::reading_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReadingSessions.def()
    }
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notes.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::quote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    WantToRead,
    Reading,
    Read,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "want_to_read",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Read => "read",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "want_to_read" => Ok(ReadingStatus::WantToRead),
            "reading" => Ok(ReadingStatus::Reading),
            "read" => Ok(ReadingStatus::Read),
            other => Err(format!("\"{}\" is not a valid choice.", other)),
        }
    }
}

/// UserBook as returned by the API, with its book and shelves inlined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserBook {
    pub id: i32,
    pub user: i32,
    pub book: i32,
    pub book_details: Book,
    pub shelves: Vec<Shelf>,
    pub status: String,
    pub current_page: i32,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub rating: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserBook {
    pub fn new(model: Model, book: Book, shelves: Vec<Shelf>) -> Self {
        Self {
            id: model.id,
            user: model.user_id,
            book: model.book_id,
            book_details: book,
            shelves,
            status: model.status,
            current_page: model.current_page,
            start_date: model.start_date,
            end_date: model.end_date,
            rating: model.rating,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_only_known_values() {
        assert_eq!("reading".parse::<ReadingStatus>(), Ok(ReadingStatus::Reading));
        assert_eq!(ReadingStatus::WantToRead.to_string(), "want_to_read");
        assert!("finished".parse::<ReadingStatus>().is_err());
    }
}
