use crate::api;
use crate::services::user_book_service::{ReadingStatistics, StatusCount};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::register,
        api::auth::login,
        api::books::list_books,
        api::books::create_book,
        api::books::get_book,
        api::books::update_book,
        api::books::delete_book,
        api::books::search_google_books,
        api::books::import_book,
        api::books::add_to_collection,
        api::shelves::list_shelves,
        api::shelves::create_shelf,
        api::shelves::get_shelf,
        api::shelves::update_shelf,
        api::shelves::delete_shelf,
        api::shelves::shelf_books,
        api::user_books::list_user_books,
        api::user_books::create_user_book,
        api::user_books::get_user_book,
        api::user_books::update_user_book,
        api::user_books::delete_user_book,
        api::user_books::update_progress,
        api::user_books::statistics,
        api::reading_sessions::list_sessions,
        api::reading_sessions::create_session,
        api::reading_sessions::get_session,
        api::reading_sessions::update_session,
        api::reading_sessions::delete_session,
        api::notes::list_notes,
        api::notes::create_note,
        api::notes::get_note,
        api::notes::update_note,
        api::notes::delete_note,
        api::reviews::list_reviews,
        api::reviews::create_review,
        api::reviews::get_review,
        api::reviews::update_review,
        api::reviews::delete_review,
        api::quotes::list_quotes,
        api::quotes::create_quote,
        api::quotes::get_quote,
        api::quotes::update_quote,
        api::quotes::delete_quote,
    ),
    components(
        schemas(
            crate::models::Book,
            crate::models::Shelf,
            crate::models::UserBook,
            crate::models::ReadingStatus,
            crate::models::ReadingSession,
            crate::models::Note,
            crate::models::Review,
            crate::models::Quote,
            crate::domain::BookDraft,
            ReadingStatistics,
            StatusCount,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "shelfmark", description = "Shelfmark reading tracker API")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
