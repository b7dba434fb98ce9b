use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Json},
    http::{StatusCode, request::Parts},
};
use serde_json::json;

use crate::domain::Principal;
use crate::infrastructure::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub exp: usize,
}

impl Claims {
    pub fn principal(&self) -> Option<Principal> {
        Some(Principal {
            user_id: self.sub.parse().ok()?,
            username: self.username.clone(),
        })
    }
}

type AuthRejection = (StatusCode, Json<serde_json::Value>);

fn unauthorized(message: &str) -> AuthRejection {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message })))
}

// Stateless: the token alone identifies the caller, no session lookup
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization header format"))?;

        let claims = decode_jwt(&state.config().jwt_secret, token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        claims
            .principal()
            .ok_or_else(|| unauthorized("Invalid or expired token"))
    }
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn create_jwt(
    secret: &str,
    user_id: i32,
    username: &str,
    ttl_hours: i64,
) -> Result<String, String> {
    let expiration = Duration::try_hours(ttl_hours)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or("token expiry out of range")?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_owned(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

pub fn decode_jwt(secret: &str, token: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("super_secret_password").expect("hash");

        assert_ne!(hash, "super_secret_password");
        assert!(verify_password("super_secret_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn jwt_carries_the_principal() {
        let token = create_jwt("k", 42, "reader", 1).expect("token");
        let claims = decode_jwt("k", &token).expect("claims");

        assert_eq!(
            claims.principal(),
            Some(Principal {
                user_id: 42,
                username: "reader".to_string()
            })
        );
    }

    #[test]
    fn jwt_rejects_foreign_secret() {
        let token = create_jwt("k", 1, "reader", 1).expect("token");
        assert!(decode_jwt("other", &token).is_err());
    }

    #[test]
    fn jwt_with_unrepresentable_ttl_is_an_error() {
        assert!(create_jwt("k", 1, "reader", i64::MAX).is_err());
    }
}
