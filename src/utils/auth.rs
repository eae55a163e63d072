use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    error::ApiError,
    models::{Claims, UserData},
};

pub fn test_password(password: &str) -> Option<&'static str> {
    if password.chars().count() < 8 {
        Some("Password must be at least 8 characters long")
    } else if !password.chars().any(|c| c.is_uppercase()) {
        Some("Password must include at least one uppercase letter")
    } else if !password.chars().any(|c| c.is_lowercase()) {
        Some("Password must include at least one lowercase letter")
    } else if !password.chars().any(|c| c.is_numeric()) {
        Some("Password must include at least one number")
    } else {
        None
    }
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
    bcrypt::hash(password, cost).map_err(|e| ApiError::Internal(format!("hash failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    bcrypt::verify(password, hash)
        .map_err(|e| ApiError::Internal(format!("password verification failed: {e}")))
}

/// Signs an HS256 access token for `user` that expires after `ttl_minutes`.
pub fn issue_access_token(user: &UserData, secret: &str, ttl_minutes: i64) -> Result<String, ApiError> {
    let exp = ChronoDuration::try_minutes(ttl_minutes)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| {
            ApiError::Internal(format!("token lifetime of {ttl_minutes} minutes is out of range"))
        })?;
    let claims = Claims {
        exp: exp.timestamp().max(0) as usize,
        user: user.clone(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("access token creation failed: {e}")))
}

pub fn decode_access_token(token: &str, secret: &str) -> Result<UserData, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.user)
}
