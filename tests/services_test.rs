use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use shelfmark::db;
use shelfmark::domain::{BookDraft, DomainError, Principal};
use shelfmark::models::{self, UserBook, reading_session};
use shelfmark::services::book_service;
use shelfmark::services::note_service::{self, CreateNoteInput};
use shelfmark::services::quote_service::{self, CreateQuoteInput, UpdateQuoteInput};
use shelfmark::services::review_service::{self, CreateReviewInput};
use shelfmark::services::shelf_service::{self, CreateShelfInput};
use shelfmark::services::user_book_service::{
    self, CreateUserBookInput, ProgressUpdate, UpdateUserBookInput,
};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

// Helper to create a user and act as them
async fn create_reader(db: &DatabaseConnection, username: &str) -> Principal {
    let user = models::user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password_hash: Set("hash".to_string()),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create user");

    Principal {
        user_id: user.id,
        username: user.username,
    }
}

fn draft(google_books_id: &str, title: &str) -> BookDraft {
    BookDraft {
        google_books_id: google_books_id.to_string(),
        title: title.to_string(),
        authors: vec!["Ursula K. Le Guin".to_string()],
        published_date: Some("1969".to_string()),
        description: String::new(),
        page_count: Some(304),
        categories: vec!["Fiction".to_string()],
        thumbnail_url: String::new(),
        language: "en".to_string(),
    }
}

async fn create_book(db: &DatabaseConnection, google_books_id: &str) -> i32 {
    let (book, _) = book_service::create_or_update_book(db, draft(google_books_id, "A Book"))
        .await
        .expect("Failed to create book");
    book.id
}

fn tracking(book: i32) -> CreateUserBookInput {
    CreateUserBookInput {
        book,
        status: Some("reading".to_string()),
        current_page: None,
        start_date: None,
        end_date: None,
        rating: None,
        shelf_ids: Vec::new(),
    }
}

async fn track(db: &DatabaseConnection, principal: &Principal, book: i32) -> UserBook {
    user_book_service::create_user_book(db, principal, tracking(book))
        .await
        .expect("Failed to track book")
}

async fn session_count(db: &DatabaseConnection, user_book_id: i32) -> u64 {
    reading_session::Entity::find()
        .filter(reading_session::Column::UserBookId.eq(user_book_id))
        .count(db)
        .await
        .expect("count")
}

fn shelf_named(name: &str) -> CreateShelfInput {
    CreateShelfInput {
        name: name.to_string(),
        is_default: false,
    }
}

#[tokio::test]
async fn test_shelf_name_unique_per_user() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let bob = create_reader(&db, "bob").await;

    shelf_service::create_shelf(&db, &alice, shelf_named("Favourites"))
        .await
        .expect("first shelf");

    let err = shelf_service::create_shelf(&db, &alice, shelf_named("Favourites"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { ref field, .. } if field == "name"));

    // Same name under another user is fine
    shelf_service::create_shelf(&db, &bob, shelf_named("Favourites"))
        .await
        .expect("other user's shelf");
}

#[tokio::test]
async fn test_rating_must_be_between_one_and_five() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let book = create_book(&db, "vol-1").await;

    for rating in [0, 6, -1] {
        let mut input = tracking(book);
        input.rating = Some(rating);
        let err = user_book_service::create_user_book(&db, &alice, input)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "rating"));
    }

    let user_book = track(&db, &alice, book).await;

    let err = user_book_service::update_user_book(
        &db,
        &alice,
        user_book.id,
        UpdateUserBookInput {
            rating: Some(Some(9)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    let rated = user_book_service::update_user_book(
        &db,
        &alice,
        user_book.id,
        UpdateUserBookInput {
            rating: Some(Some(5)),
            ..Default::default()
        },
    )
    .await
    .expect("valid rating");
    assert_eq!(rated.rating, Some(5));

    let cleared = user_book_service::update_user_book(
        &db,
        &alice,
        user_book.id,
        UpdateUserBookInput {
            rating: Some(None),
            ..Default::default()
        },
    )
    .await
    .expect("cleared rating");
    assert_eq!(cleared.rating, None);
}

#[tokio::test]
async fn test_progress_with_valid_session() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let book = create_book(&db, "vol-1").await;
    let user_book = track(&db, &alice, book).await;

    let updated = user_book_service::update_progress(
        &db,
        &alice,
        user_book.id,
        ProgressUpdate {
            current_page: Some(75),
            create_session: true,
            start_page: Some(50),
            start_time: Some("2024-03-01T20:00:00Z".to_string()),
            end_time: Some("2024-03-01T21:00:00Z".to_string()),
            notes: Some("Evening chapter".to_string()),
        },
    )
    .await
    .expect("progress");

    assert_eq!(updated.current_page, 75);
    assert_eq!(session_count(&db, user_book.id).await, 1);

    let session = reading_session::Entity::find()
        .filter(reading_session::Column::UserBookId.eq(user_book.id))
        .one(&db)
        .await
        .unwrap()
        .expect("session");
    assert_eq!(session.start_page, 50);
    assert_eq!(session.end_page, 75);
    assert_eq!(session.notes, "Evening chapter");
}

#[tokio::test]
async fn test_progress_with_backwards_pages_skips_session() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let book = create_book(&db, "vol-1").await;
    let user_book = track(&db, &alice, book).await;

    let updated = user_book_service::update_progress(
        &db,
        &alice,
        user_book.id,
        ProgressUpdate {
            current_page: Some(75),
            create_session: true,
            start_page: Some(80),
            start_time: Some("2024-03-01T20:00:00Z".to_string()),
            end_time: Some("2024-03-01T21:00:00Z".to_string()),
            notes: None,
        },
    )
    .await
    .expect("page update still succeeds");

    assert_eq!(updated.current_page, 75);
    assert_eq!(session_count(&db, user_book.id).await, 0);
}

#[tokio::test]
async fn test_progress_with_bad_times_skips_session() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let book = create_book(&db, "vol-1").await;
    let user_book = track(&db, &alice, book).await;

    let updated = user_book_service::update_progress(
        &db,
        &alice,
        user_book.id,
        ProgressUpdate {
            current_page: Some(20),
            create_session: true,
            start_time: Some("last tuesday".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("page update still succeeds");

    assert_eq!(updated.current_page, 20);
    assert_eq!(session_count(&db, user_book.id).await, 0);
}

#[tokio::test]
async fn test_progress_session_starts_at_previous_page() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let book = create_book(&db, "vol-1").await;
    let mut input = tracking(book);
    input.current_page = Some(30);
    let user_book = user_book_service::create_user_book(&db, &alice, input)
        .await
        .expect("track");

    user_book_service::update_progress(
        &db,
        &alice,
        user_book.id,
        ProgressUpdate {
            current_page: Some(42),
            create_session: true,
            start_time: Some("2024-03-02T08:00:00+01:00".to_string()),
            end_time: Some("2024-03-02T08:30:00+01:00".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("progress");

    let session = reading_session::Entity::find()
        .filter(reading_session::Column::UserBookId.eq(user_book.id))
        .one(&db)
        .await
        .unwrap()
        .expect("session");
    assert_eq!(session.start_page, 30);
    assert_eq!(session.end_page, 42);
}

#[tokio::test]
async fn test_progress_rejects_negative_page_and_foreign_books() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let bob = create_reader(&db, "bob").await;
    let book = create_book(&db, "vol-1").await;
    let user_book = track(&db, &alice, book).await;

    let err = user_book_service::update_progress(
        &db,
        &alice,
        user_book.id,
        ProgressUpdate {
            current_page: Some(-1),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    let err = user_book_service::update_progress(
        &db,
        &bob,
        user_book.id,
        ProgressUpdate {
            current_page: Some(10),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound));
}

#[tokio::test]
async fn test_statistics_on_empty_collection() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;

    let stats = user_book_service::statistics(&db, &alice)
        .await
        .expect("stats");

    assert_eq!(stats.total_books, 0);
    assert!(stats.books_by_status.is_empty());
    assert_eq!(stats.average_rating, None);
    assert_eq!(stats.currently_reading, 0);
}

#[tokio::test]
async fn test_statistics_aggregates_only_own_books() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let bob = create_reader(&db, "bob").await;

    let mut ids = Vec::new();
    for n in 0..3 {
        ids.push(create_book(&db, &format!("vol-{}", n)).await);
    }

    let mut read = tracking(ids[0]);
    read.status = Some("read".to_string());
    read.rating = Some(4);
    user_book_service::create_user_book(&db, &alice, read).await.unwrap();

    let mut read = tracking(ids[1]);
    read.status = Some("read".to_string());
    read.rating = Some(5);
    user_book_service::create_user_book(&db, &alice, read).await.unwrap();

    track(&db, &alice, ids[2]).await;

    let mut other = tracking(ids[2]);
    other.rating = Some(1);
    user_book_service::create_user_book(&db, &bob, other).await.unwrap();

    let stats = user_book_service::statistics(&db, &alice)
        .await
        .expect("stats");

    assert_eq!(stats.total_books, 3);
    assert_eq!(stats.currently_reading, 1);
    assert_eq!(stats.average_rating, Some(4.5));

    let read_count = stats
        .books_by_status
        .iter()
        .find(|s| s.status == "read")
        .map(|s| s.count);
    assert_eq!(read_count, Some(2));
    assert!(stats.books_by_status.iter().all(|s| s.status != "want_to_read"));
}

#[tokio::test]
async fn test_private_review_visibility() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let bob = create_reader(&db, "bob").await;
    let book = create_book(&db, "vol-1").await;
    let user_book = track(&db, &alice, book).await;

    let private = review_service::create_review(
        &db,
        &alice,
        CreateReviewInput {
            user_book: user_book.id,
            content: "Notes to self".to_string(),
            is_public: false,
        },
    )
    .await
    .expect("private review");

    let public = review_service::create_review(
        &db,
        &alice,
        CreateReviewInput {
            user_book: user_book.id,
            content: "Wonderful".to_string(),
            is_public: true,
        },
    )
    .await
    .expect("public review");
    assert_eq!(public.username, "alice");

    let seen_by_bob = review_service::list_reviews(&db, &bob).await.unwrap();
    assert_eq!(seen_by_bob.len(), 1);
    assert_eq!(seen_by_bob[0].id, public.id);
    assert_eq!(seen_by_bob[0].username, "alice");

    let seen_by_alice = review_service::list_reviews(&db, &alice).await.unwrap();
    assert_eq!(seen_by_alice.len(), 2);

    // Direct access stays owner-scoped, public or not
    assert!(matches!(
        review_service::get_review(&db, &bob, private.id).await,
        Err(DomainError::NotFound)
    ));
    assert!(matches!(
        review_service::get_review(&db, &bob, public.id).await,
        Err(DomainError::NotFound)
    ));
    assert!(review_service::get_review(&db, &alice, private.id).await.is_ok());
}

#[tokio::test]
async fn test_foreign_shelf_ids_are_dropped() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let bob = create_reader(&db, "bob").await;
    let book = create_book(&db, "vol-1").await;

    let own = shelf_service::create_shelf(&db, &alice, shelf_named("Mine"))
        .await
        .unwrap();
    let foreign = shelf_service::create_shelf(&db, &bob, shelf_named("Bob's"))
        .await
        .unwrap();

    let mut input = tracking(book);
    input.shelf_ids = vec![own.id, foreign.id, 9999];
    let user_book = user_book_service::create_user_book(&db, &alice, input)
        .await
        .expect("no error for foreign shelves");

    let shelf_ids: Vec<i32> = user_book.shelves.iter().map(|s| s.id).collect();
    assert_eq!(shelf_ids, vec![own.id]);

    let on_bobs_shelf = shelf_service::list_shelf_books(&db, &bob, foreign.id)
        .await
        .unwrap();
    assert!(on_bobs_shelf.is_empty());
}

#[tokio::test]
async fn test_shelf_ids_update_replaces_set() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let book = create_book(&db, "vol-1").await;
    let first = shelf_service::create_shelf(&db, &alice, shelf_named("First"))
        .await
        .unwrap();
    let second = shelf_service::create_shelf(&db, &alice, shelf_named("Second"))
        .await
        .unwrap();

    let mut input = tracking(book);
    input.shelf_ids = vec![first.id];
    let user_book = user_book_service::create_user_book(&db, &alice, input)
        .await
        .unwrap();

    let moved = user_book_service::update_user_book(
        &db,
        &alice,
        user_book.id,
        UpdateUserBookInput {
            shelf_ids: Some(vec![second.id]),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let shelf_ids: Vec<i32> = moved.shelves.iter().map(|s| s.id).collect();
    assert_eq!(shelf_ids, vec![second.id]);

    // Deleting a shelf leaves the tracked book alone
    shelf_service::delete_shelf(&db, &alice, second.id).await.unwrap();
    let after = user_book_service::get_user_book(&db, &alice, user_book.id)
        .await
        .expect("still tracked");
    assert!(after.shelves.is_empty());
}

#[tokio::test]
async fn test_upsert_is_idempotent() {
    let db = setup_test_db().await;

    let (first, created) = book_service::create_or_update_book(&db, draft("vol-1", "Old Title"))
        .await
        .unwrap();
    assert!(created);

    let (second, created) =
        book_service::create_or_update_book(&db, draft("vol-1", "New Title"))
            .await
            .unwrap();
    assert!(!created);
    assert_eq!(second.id, first.id);
    assert_eq!(second.title, "New Title");

    let rows = models::book::Entity::find().count(&db).await.unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_tracking_a_book_twice_conflicts() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let book = create_book(&db, "vol-1").await;
    track(&db, &alice, book).await;

    let err = user_book_service::create_user_book(&db, &alice, tracking(book))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { ref field, .. } if field == "book"));

    let err = user_book_service::create_user_book(&db, &alice, tracking(424242))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "book"));
}

#[tokio::test]
async fn test_children_need_an_owned_parent_and_cascade() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let bob = create_reader(&db, "bob").await;
    let book = create_book(&db, "vol-1").await;
    let user_book = track(&db, &alice, book).await;

    let err = note_service::create_note(
        &db,
        &bob,
        CreateNoteInput {
            user_book: user_book.id,
            content: "Sneaky".to_string(),
            page_number: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound));

    let note = note_service::create_note(
        &db,
        &alice,
        CreateNoteInput {
            user_book: user_book.id,
            content: "Remember the map".to_string(),
            page_number: Some(12),
        },
    )
    .await
    .expect("note");
    assert!(matches!(
        note_service::get_note(&db, &bob, note.id).await,
        Err(DomainError::NotFound)
    ));

    user_book_service::delete_user_book(&db, &alice, user_book.id)
        .await
        .unwrap();
    let notes = models::note::Entity::find().count(&db).await.unwrap();
    assert_eq!(notes, 0);
}

#[tokio::test]
async fn test_book_search_takes_wildcards_literally() {
    let db = setup_test_db().await;

    let mut dune = draft("vol-dune", "Dune");
    dune.authors = vec!["Frank Herbert".to_string()];
    let mut emma = draft("vol-emma", "Emma");
    emma.authors = vec!["Jane Austen".to_string(), "X".to_string()];
    let mut odds = draft("vol-odds", "100% Odds_Ends");
    odds.authors = vec!["Anon".to_string()];
    for book in [dune, emma, odds] {
        book_service::create_or_update_book(&db, book).await.unwrap();
    }

    let titles = |books: Vec<models::Book>| -> Vec<String> {
        books.into_iter().map(|b| b.title).collect()
    };

    for term in ["%", "_", "\"", "[", ","] {
        let found = book_service::list_books(&db, Some(term)).await.unwrap();
        let expected: Vec<String> = match term {
            "%" | "_" => vec!["100% Odds_Ends".to_string()],
            _ => Vec::new(),
        };
        assert_eq!(titles(found), expected, "search {:?}", term);
    }

    let found = book_service::list_books(&db, Some("herbert")).await.unwrap();
    assert_eq!(titles(found), vec!["Dune".to_string()]);

    let found = book_service::list_books(&db, Some("austen")).await.unwrap();
    assert_eq!(titles(found), vec!["Emma".to_string()]);

    let found = book_service::list_books(&db, Some("  ")).await.unwrap();
    assert_eq!(found.len(), 3);
}

#[tokio::test]
async fn test_quote_lifecycle() {
    let db = setup_test_db().await;
    let alice = create_reader(&db, "alice").await;
    let book = create_book(&db, "vol-1").await;
    let user_book = track(&db, &alice, book).await;

    let err = quote_service::create_quote(
        &db,
        &alice,
        CreateQuoteInput {
            user_book: user_book.id,
            content: "   ".to_string(),
            page_number: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "content"));

    let quote = quote_service::create_quote(
        &db,
        &alice,
        CreateQuoteInput {
            user_book: user_book.id,
            content: "The night is long".to_string(),
            page_number: Some(42),
        },
    )
    .await
    .expect("quote");
    assert_eq!(quote.user_book, user_book.id);
    assert_eq!(quote.page_number, Some(42));

    // Empty patch leaves the quote as it was
    let same = quote_service::update_quote(&db, &alice, quote.id, UpdateQuoteInput::default())
        .await
        .unwrap();
    assert_eq!(same, quote);

    let updated = quote_service::update_quote(
        &db,
        &alice,
        quote.id,
        UpdateQuoteInput {
            content: Some("The night is dark".to_string()),
            page_number: Some(None),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.content, "The night is dark");
    assert_eq!(updated.page_number, None);
    assert_eq!(updated.created_at, quote.created_at);

    let listed = quote_service::list_quotes(&db, &alice).await.unwrap();
    assert_eq!(listed, vec![updated]);

    quote_service::delete_quote(&db, &alice, quote.id)
        .await
        .unwrap();
    assert!(matches!(
        quote_service::get_quote(&db, &alice, quote.id).await,
        Err(DomainError::NotFound)
    ));
}
