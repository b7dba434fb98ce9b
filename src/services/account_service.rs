//! Account Service - registration and login
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::auth::{create_jwt, hash_password, verify_password};
use crate::infrastructure::config::Config;
use crate::models::user;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login failures are reported distinctly, unlike resource lookups
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("No account found with this email")]
    UnknownEmail,
    #[error("Invalid password")]
    InvalidPassword,
    #[error(transparent)]
    Domain(#[from] DomainError),
}

fn issue_token(config: &Config, user: &user::Model) -> Result<String, DomainError> {
    create_jwt(
        &config.jwt_secret,
        user.id,
        &user.username,
        config.token_ttl_hours,
    )
    .map_err(DomainError::Internal)
}

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "This field is required."));
    }
    Ok(())
}

/// Create an account and return a bearer token for it
pub async fn register(
    db: &DatabaseConnection,
    config: &Config,
    input: RegisterInput,
) -> Result<String, DomainError> {
    require("username", &input.username)?;
    require("email", &input.email)?;
    require("password", &input.password)?;

    let username = input.username.trim().to_string();
    let email = input.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(DomainError::validation(
            "email",
            "Enter a valid email address.",
        ));
    }

    let taken_username = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(db)
        .await?;
    if taken_username.is_some() {
        return Err(DomainError::conflict("username", "Username already exists"));
    }

    let taken_email = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?;
    if taken_email.is_some() {
        return Err(DomainError::conflict("email", "Email already exists"));
    }

    let password_hash = hash_password(&input.password).map_err(DomainError::Internal)?;

    let user = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        password_hash: Set(password_hash),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(user_id = user.id, "Registered user {}", user.username);
    issue_token(config, &user)
}

/// Exchange email and password for a bearer token
pub async fn login(
    db: &DatabaseConnection,
    config: &Config,
    input: LoginInput,
) -> Result<String, LoginError> {
    let email = input.email.trim().to_lowercase();

    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await
        .map_err(DomainError::from)?
        .ok_or_else(|| {
            tracing::debug!("Login attempt for unknown email");
            LoginError::UnknownEmail
        })?;

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(DomainError::Internal)?;
    if !valid {
        tracing::warn!(user_id = user.id, "Password verification failed");
        return Err(LoginError::InvalidPassword);
    }

    tracing::info!(user_id = user.id, "Login succeeded");
    Ok(issue_token(config, &user)?)
}
