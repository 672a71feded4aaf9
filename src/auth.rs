use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::User;
use crate::settings::Settings;
use crate::validation::validate_registration;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    #[schema(value_type = Option<String>, format = "date", example = "1990-04-12")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn find_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ? LIMIT 1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Create a user account. Fails on missing required fields and on an email
/// that is already registered; the password is stored as a salted bcrypt hash.
pub async fn register(pool: &SqlitePool, request: RegisterRequest) -> Result<User, ApiError> {
    validate_registration(&request)?;

    if find_by_email(pool, &request.email).await?.is_some() {
        return Err(ApiError::DuplicateEmail);
    }

    let password_hash = hash(&request.password, DEFAULT_COST)?;
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (full_name, email, phone, gender, birthday, password_hash, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(&request.full_name)
    .bind(&request.email)
    .bind(&request.phone)
    .bind(&request.gender)
    .bind(request.birthday)
    .bind(&password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Verify credentials against the stored hash. Unknown emails and wrong
/// passwords are indistinguishable to the caller.
pub async fn login(pool: &SqlitePool, email: &str, password: &str) -> Result<User, ApiError> {
    let Some(user) = find_by_email(pool, email).await? else {
        return Err(ApiError::InvalidCredentials);
    };
    if !verify(password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }
    Ok(user)
}

/// Token check for the admin surface, accepting either a Bearer header or a
/// `?token=` query parameter.
pub fn verify_admin_token(
    settings: &Settings,
    auth: Option<Authorization<Bearer>>,
    query_token: Option<&str>,
) -> Result<(), ApiError> {
    let provided_token = auth
        .map(|a| a.token().to_string())
        .or_else(|| query_token.map(|s| s.to_string()));
    match provided_token {
        Some(token) if token == settings.admin_token => Ok(()),
        _ => Err(ApiError::Unauthorized(
            "Invalid authentication token".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            database_url: "sqlite::memory:".to_string(),
            debug: false,
            admin_token: "secret".to_string(),
            enable_swagger: true,
            port: 8080,
            session_ttl_days: 7,
        }
    }

    #[test]
    fn test_verify_admin_token_header() {
        let auth = Authorization::bearer("secret").unwrap();
        assert!(verify_admin_token(&settings(), Some(auth), None).is_ok());
    }

    #[test]
    fn test_verify_admin_token_query() {
        assert!(verify_admin_token(&settings(), None, Some("secret")).is_ok());
        assert!(verify_admin_token(&settings(), None, Some("bad")).is_err());
        assert!(verify_admin_token(&settings(), None, None).is_err());
    }
}
