//! Cookie-backed sessions: opaque random tokens stored in the database,
//! resolved to a user on every authenticated request.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use rand::{Rng, thread_rng};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::AppState;
use crate::error::ApiError;
use crate::models::{SessionRow, User};

pub const SESSION_COOKIE: &str = "session";

/// 32 random bytes, hashed and hex-encoded so the stored token carries no
/// structure.
pub fn generate_token() -> String {
    let bytes: [u8; 32] = thread_rng().r#gen();
    let mut hasher: Sha256 = Digest::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Insert a new session for `user_id`. Expired rows are swept here so
/// abandoned sessions cannot accumulate; [`resolve_user`] only removes the
/// token it is handed.
pub async fn create_session(
    pool: &SqlitePool,
    user_id: i64,
    ttl_days: i64,
) -> Result<SessionRow, sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
        .bind(Utc::now())
        .execute(pool)
        .await?;

    let session = SessionRow {
        token: generate_token(),
        user_id,
        expires_at: Utc::now() + Duration::days(ttl_days),
    };
    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?, ?, ?)")
        .bind(&session.token)
        .bind(session.user_id)
        .bind(session.expires_at)
        .execute(pool)
        .await?;
    Ok(session)
}

pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Resolve a session token to its user. Expired sessions are deleted on
/// sight and treated as absent.
pub async fn resolve_user(pool: &SqlitePool, token: &str) -> Result<Option<User>, sqlx::Error> {
    let Some(session) =
        sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE token = ? LIMIT 1")
            .bind(token)
            .fetch_optional(pool)
            .await?
    else {
        return Ok(None);
    };

    if session.expires_at < Utc::now() {
        delete_session(pool, token).await?;
        return Ok(None);
    }

    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ? LIMIT 1")
        .bind(session.user_id)
        .fetch_optional(pool)
        .await
}

pub fn build_session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    let same_site = if secure { "Strict" } else { "Lax" };
    format!(
        "{}={}; HttpOnly{}; SameSite={}; Path=/; Max-Age={}",
        SESSION_COOKIE, token, secure_flag, same_site, max_age_secs
    )
}

pub fn build_clear_cookie(secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    let same_site = if secure { "Strict" } else { "Lax" };
    format!(
        "{}=; HttpOnly{}; SameSite={}; Path=/; Max-Age=0",
        SESSION_COOKIE, secure_flag, same_site
    )
}

pub fn extract_session_token(cookie_header: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let trimmed = part.trim();
        if let Some(value) = trimmed.strip_prefix("session=") {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn session_token_from_parts(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_session_token)
}

/// Extractor for routes that render differently for guests: resolves to
/// `None` instead of rejecting when no valid session is present.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token_from_parts(parts) else {
            return Ok(MaybeUser(None));
        };
        Ok(MaybeUser(resolve_user(&state.db, &token).await?))
    }
}

/// Extractor gating authenticated-only routes; rejects with 401 when no
/// valid session is present.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(user)) => Ok(CurrentUser(user)),
            MaybeUser(None) => Err(ApiError::Unauthorized("authentication required".into())),
        }
    }
}
