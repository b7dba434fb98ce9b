pub mod auth;
pub mod books;
pub mod error;
pub mod health;
pub mod notes;
pub mod quotes;
pub mod reading_sessions;
pub mod reviews;
pub mod shelves;
pub mod user_books;

use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/search_google_books", get(books::search_google_books))
        .route("/books/import/:google_books_id", post(books::import_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .patch(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:id/add_to_collection", post(books::add_to_collection))
        // Shelves
        .route(
            "/shelves",
            get(shelves::list_shelves).post(shelves::create_shelf),
        )
        .route(
            "/shelves/:id",
            get(shelves::get_shelf)
                .put(shelves::update_shelf)
                .patch(shelves::update_shelf)
                .delete(shelves::delete_shelf),
        )
        .route("/shelves/:id/books", get(shelves::shelf_books))
        // Tracked books
        .route(
            "/userbooks",
            get(user_books::list_user_books).post(user_books::create_user_book),
        )
        .route("/userbooks/statistics", get(user_books::statistics))
        .route(
            "/userbooks/:id",
            get(user_books::get_user_book)
                .put(user_books::update_user_book)
                .patch(user_books::update_user_book)
                .delete(user_books::delete_user_book),
        )
        .route(
            "/userbooks/:id/update_progress",
            post(user_books::update_progress),
        )
        // Reading journal
        .route(
            "/reading-sessions",
            get(reading_sessions::list_sessions).post(reading_sessions::create_session),
        )
        .route(
            "/reading-sessions/:id",
            get(reading_sessions::get_session)
                .put(reading_sessions::update_session)
                .patch(reading_sessions::update_session)
                .delete(reading_sessions::delete_session),
        )
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/reviews/:id",
            get(reviews::get_review)
                .put(reviews::update_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route("/quotes", get(quotes::list_quotes).post(quotes::create_quote))
        .route(
            "/quotes/:id",
            get(quotes::get_quote)
                .put(quotes::update_quote)
                .patch(quotes::update_quote)
                .delete(quotes::delete_quote),
        )
        .with_state(state)
}
