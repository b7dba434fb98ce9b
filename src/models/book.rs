use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::BookDraft;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub google_books_id: String,
    pub title: String,
    pub authors: String, // JSON array
    pub published_date: Option<String>,
    pub description: String,
    pub page_count: Option<i32>,
    pub categories: String, // JSON array
    pub thumbnail_url: String,
    pub language: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_book::Entity")]
    UserBooks,
}

impl Related<super::user_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserBooks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub google_books_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published_date: Option<String>,
    pub description: String,
    pub page_count: Option<i32>,
    pub categories: Vec<String>,
    pub thumbnail_url: String,
    pub language: String,
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            google_books_id: model.google_books_id,
            title: model.title,
            authors: serde_json::from_str(&model.authors).unwrap_or_default(),
            published_date: model.published_date,
            description: model.description,
            page_count: model.page_count,
            categories: serde_json::from_str(&model.categories).unwrap_or_default(),
            thumbnail_url: model.thumbnail_url,
            language: model.language,
        }
    }
}

pub fn encode_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

impl ActiveModel {
    /// Copy every catalog field of a draft onto this row
    pub fn apply_draft(&mut self, draft: BookDraft) {
        self.google_books_id = Set(draft.google_books_id);
        self.title = Set(draft.title);
        self.authors = Set(encode_list(&draft.authors));
        self.published_date = Set(draft.published_date);
        self.description = Set(draft.description);
        self.page_count = Set(draft.page_count);
        self.categories = Set(encode_list(&draft.categories));
        self.thumbnail_url = Set(draft.thumbnail_url);
        self.language = Set(draft.language);
    }
}
