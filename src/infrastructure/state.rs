//! Application state containing the database pool and shared collaborators

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::CatalogLookup;
use crate::google_books::GoogleBooksClient;
use crate::infrastructure::config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    config: Arc<Config>,
    /// External book catalog
    pub catalog: Arc<dyn CatalogLookup>,
}

impl AppState {
    /// Create a new AppState backed by the Google Books catalog
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let catalog = Arc::new(GoogleBooksClient::new(
            &config.google_books_base_url,
            config.google_books_api_key.clone(),
        ));
        Self::with_catalog(db, config, catalog)
    }

    pub fn with_catalog(
        db: DatabaseConnection,
        config: Config,
        catalog: Arc<dyn CatalogLookup>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            catalog,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
