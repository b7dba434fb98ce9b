use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);
    if database_url.contains(":memory:") {
        // Every connection to :memory: opens its own empty database
        options.max_connections(1).min_connections(1);
    }
    let db = Database::connect(options).await?;

    // Cascades on user_books children and shelf links rely on this
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = ON".to_owned(),
    ))
    .await?;

    run_migrations(&db).await?;

    Ok(db)
}

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        google_books_id TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        authors TEXT NOT NULL DEFAULT '[]',
        published_date TEXT,
        description TEXT NOT NULL DEFAULT '',
        page_count INTEGER,
        categories TEXT NOT NULL DEFAULT '[]',
        thumbnail_url TEXT NOT NULL DEFAULT '',
        language TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS shelves (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        user_id INTEGER NOT NULL,
        is_default BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        UNIQUE (name, user_id),
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        book_id INTEGER NOT NULL,
        status TEXT NOT NULL DEFAULT 'want_to_read'
            CHECK (status IN ('want_to_read', 'reading', 'read')),
        current_page INTEGER NOT NULL DEFAULT 0 CHECK (current_page >= 0),
        start_date TEXT,
        end_date TEXT,
        rating INTEGER CHECK (rating IS NULL OR (rating >= 1 AND rating <= 5)),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (user_id, book_id),
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_book_shelves (
        user_book_id INTEGER NOT NULL,
        shelf_id INTEGER NOT NULL,
        PRIMARY KEY (user_book_id, shelf_id),
        FOREIGN KEY (user_book_id) REFERENCES user_books(id) ON DELETE CASCADE,
        FOREIGN KEY (shelf_id) REFERENCES shelves(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reading_sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_book_id INTEGER NOT NULL,
        start_page INTEGER NOT NULL,
        end_page INTEGER NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        notes TEXT NOT NULL DEFAULT '',
        CHECK (end_page >= start_page),
        FOREIGN KEY (user_book_id) REFERENCES user_books(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_book_id INTEGER NOT NULL,
        content TEXT NOT NULL,
        page_number INTEGER,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (user_book_id) REFERENCES user_books(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_book_id INTEGER NOT NULL,
        content TEXT NOT NULL,
        is_public BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (user_book_id) REFERENCES user_books(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS quotes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_book_id INTEGER NOT NULL,
        content TEXT NOT NULL,
        page_number INTEGER,
        created_at TEXT NOT NULL,
        FOREIGN KEY (user_book_id) REFERENCES user_books(id) ON DELETE CASCADE
    )
    "#,
    // Owner-scoped lookups
    "CREATE INDEX IF NOT EXISTS idx_user_books_user ON user_books(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_shelves_user ON shelves(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_reading_sessions_user_book ON reading_sessions(user_book_id)",
    "CREATE INDEX IF NOT EXISTS idx_notes_user_book ON notes(user_book_id)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_user_book ON reviews(user_book_id)",
    "CREATE INDEX IF NOT EXISTS idx_quotes_user_book ON quotes(user_book_id)",
];

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    for sql in MIGRATIONS {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_string(),
        ))
        .await?;
    }

    tracing::debug!("Applied {} schema statements", MIGRATIONS.len());
    Ok(())
}
