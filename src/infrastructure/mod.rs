//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and migrations (db)
//! - HTTP server setup (server)
//! - Configuration loading (config)
//! - Authentication (auth)
//! - Application state (state)

pub mod auth;
pub mod config;
pub mod db;
pub mod server;
pub mod state;

pub use state::AppState;
