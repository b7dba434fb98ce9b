//! Services Layer
//!
//! Business logic extracted from HTTP handlers, one module per entity family.
//! Every function takes the database connection and, for owner-scoped
//! resources, the calling [`Principal`](crate::domain::Principal).

pub mod account_service;
pub mod book_service;
pub mod note_service;
pub mod ownership;
pub mod quote_service;
pub mod reading_session_service;
pub mod review_service;
pub mod shelf_service;
pub mod user_book_service;
