//! Bearer sessions. The raw token only ever lives on the client; the database
//! keeps its SHA-256 digest.

use chrono::{Duration, Utc};
use rand::distributions::{Alphanumeric, DistString};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::user::{SessionRow, User};

const TOKEN_LEN: usize = 64;

pub fn generate_token() -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), TOKEN_LEN)
}

pub fn token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Pulls the token out of an `Authorization` header value.
/// Accepts `Bearer <token>` as well as a bare token.
pub fn parse_authorization(value: &str) -> Option<&str> {
    let value = value.trim();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

/// Issues a new session for `user_id` and returns the raw token.
pub async fn create_session(pool: &PgPool, user_id: Uuid, ttl_hours: i64) -> Result<String, sqlx::Error> {
    let token = generate_token();
    let expires_at = Utc::now() + Duration::hours(ttl_hours);

    sqlx::query("INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(token_digest(&token))
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;

    debug!("Issued session for user {user_id} expiring at {expires_at}");
    Ok(token)
}

pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(token_digest(token))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn purge_expired_sessions(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at < now()")
        .execute(pool)
        .await?;
    if result.rows_affected() > 0 {
        info!("Purged {} expired sessions", result.rows_affected());
    }
    Ok(result.rows_affected())
}

pub enum SessionLookup {
    Valid(User),
    Expired,
    Unknown,
}

pub async fn resolve_session(pool: &PgPool, token: &str) -> Result<SessionLookup, sqlx::Error> {
    let session: Option<SessionRow> = sqlx::query_as("SELECT * FROM sessions WHERE token_hash = $1")
        .bind(token_digest(token))
        .fetch_optional(pool)
        .await?;

    let Some(session) = session else {
        return Ok(SessionLookup::Unknown);
    };
    if session.expires_at <= Utc::now() {
        return Ok(SessionLookup::Expired);
    }

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(session.user_id)
        .fetch_optional(pool)
        .await?;

    Ok(user.map_or(SessionLookup::Unknown, SessionLookup::Valid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_prefix_is_stripped() {
        assert_eq!(parse_authorization("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_authorization("  Bearer   abc123 "), Some("abc123"));
    }

    #[test]
    fn test_bare_token_accepted() {
        assert_eq!(parse_authorization("abc123"), Some("abc123"));
    }

    #[test]
    fn test_empty_header_has_no_token() {
        assert_eq!(parse_authorization(""), None);
        assert_eq!(parse_authorization("Bearer "), None);
    }

    #[test]
    fn test_generated_tokens_are_unique_alphanumeric() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(token_digest("abc"), token_digest("abc"));
        assert_ne!(token_digest("abc"), token_digest("abd"));
        assert_eq!(
            token_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
