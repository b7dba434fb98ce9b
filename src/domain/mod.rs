//! Domain layer - Pure business abstractions
//!
//! This layer has no HTTP dependencies (no Axum, no HTTP client).
//! Only the error type, the authorization rules and the catalog contract.

pub mod authorization;
pub mod catalog;
pub mod errors;

pub use authorization::{Decision, Operation, Principal, Resource, authorize, ensure};
pub use catalog::{BookDraft, CatalogLookup};
pub use errors::DomainError;
