use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use parley_config::AuthConfig;
use parley_database::{format_timestamp, now_timestamp};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

const MAX_NAME_LENGTH: usize = 80;
const MAX_LOGIN_LENGTH: usize = 64;

#[derive(Clone)]
pub struct Authenticator {
    pool: SqlitePool,
    session_ttl: Duration,
    min_password_length: usize,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user already exists")]
    UserExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid registration: {0}")]
    InvalidRegistration(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
    #[error("user not found")]
    UserNotFound,
    #[error("session not found")]
    SessionNotFound,
    #[error("session expired")]
    SessionExpired,
    #[error("invalid session token")]
    InvalidSession,
}

/// A row of `user_profile`: the public identity shown next to messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub login: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Authenticator {
    pub fn new(pool: SqlitePool, config: AuthConfig) -> Self {
        let ttl_seconds = i64::try_from(config.session_ttl_seconds).unwrap_or(i64::MAX);
        let session_ttl = Duration::try_seconds(ttl_seconds).unwrap_or(Duration::MAX);

        Self {
            pool,
            session_ttl,
            min_password_length: config.min_password_length,
        }
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub async fn register(&self, registration: &Registration) -> Result<UserProfile, AuthError> {
        let login = registration.login.trim().to_lowercase();
        let name = registration.name.trim();
        self.validate_registration(&login, name, &registration.password)?;

        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query("SELECT user_id FROM user_credential WHERE login = ?")
            .bind(&login)
            .fetch_optional(&mut *tx)
            .await?;

        if existing.is_some() {
            return Err(AuthError::UserExists);
        }

        let now = now_timestamp();
        let user_id = Uuid::new_v4().to_string();
        let image_url = registration
            .image_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| default_avatar_url(&user_id));
        let password_hash = self.hash_password(&registration.password)?;

        sqlx::query("INSERT INTO user_profile (id, name, image_url, created_at) VALUES (?, ?, ?, ?)")
            .bind(&user_id)
            .bind(name)
            .bind(&image_url)
            .bind(&now)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO user_credential (user_id, login, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&user_id)
        .bind(&login)
        .bind(password_hash)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(user = %user_id, login = %login, "registered user");

        Ok(UserProfile {
            id: user_id,
            name: name.to_owned(),
            image_url,
            created_at: now,
        })
    }

    pub async fn login_with_password(
        &self,
        login: &str,
        password: &str,
    ) -> Result<(UserProfile, AuthSession), AuthError> {
        let credential = sqlx::query("SELECT user_id, password_hash FROM user_credential WHERE login = ?")
            .bind(login.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = credential else {
            return Err(AuthError::InvalidCredentials);
        };

        let secret: String = row.try_get("password_hash")?;
        let stored_hash = PasswordHash::new(&secret)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &stored_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let user_id: String = row.try_get("user_id")?;
        let user = self.user_profile(&user_id).await?;
        let session = self.issue_session(&user_id).await?;

        Ok((user, session))
    }

    pub async fn authenticate_token(&self, token: &str) -> Result<(UserProfile, AuthSession), AuthError> {
        let row = sqlx::query("SELECT user_id, expires_at FROM session WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(AuthError::SessionNotFound);
        };

        let user_id: String = row.try_get("user_id")?;
        let expires_at: String = row.try_get("expires_at")?;

        let expires_at = DateTime::parse_from_rfc3339(&expires_at)
            .map_err(|_| AuthError::InvalidSession)?
            .with_timezone(&Utc);

        if expires_at <= Utc::now() {
            sqlx::query("DELETE FROM session WHERE token = ?")
                .bind(token)
                .execute(&self.pool)
                .await?;
            debug!(user = %user_id, "dropped expired session");
            return Err(AuthError::SessionExpired);
        }

        let user = self.user_profile(&user_id).await?;
        let session = AuthSession {
            token: token.to_owned(),
            user_id,
            expires_at,
        };

        Ok((user, session))
    }

    /// Drop a session; unknown tokens are not an error.
    pub async fn revoke_session(&self, token: &str) -> Result<bool, AuthError> {
        let result = sqlx::query("DELETE FROM session WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn user_profile(&self, user_id: &str) -> Result<UserProfile, AuthError> {
        let row = sqlx::query("SELECT id, name, image_url, created_at FROM user_profile WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserProfile {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get("created_at")?,
        })
    }

    pub async fn issue_session(&self, user_id: &str) -> Result<AuthSession, AuthError> {
        let token = self.generate_session_token();
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.session_ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        sqlx::query("INSERT INTO session (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
            .bind(&token)
            .bind(user_id)
            .bind(format_timestamp(now))
            .bind(format_timestamp(expires_at))
            .execute(&self.pool)
            .await?;

        Ok(AuthSession {
            token,
            user_id: user_id.to_owned(),
            expires_at,
        })
    }

    fn validate_registration(&self, login: &str, name: &str, password: &str) -> Result<(), AuthError> {
        if login.is_empty() || login.len() > MAX_LOGIN_LENGTH {
            return Err(AuthError::InvalidRegistration(format!(
                "login must be between 1 and {MAX_LOGIN_LENGTH} characters"
            )));
        }

        if login.chars().any(char::is_whitespace) {
            return Err(AuthError::InvalidRegistration(
                "login cannot contain whitespace".to_string(),
            ));
        }

        if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
            return Err(AuthError::InvalidRegistration(format!(
                "name must be between 1 and {MAX_NAME_LENGTH} characters"
            )));
        }

        if password.chars().count() < self.min_password_length {
            return Err(AuthError::InvalidRegistration(format!(
                "password must be at least {} characters",
                self.min_password_length
            )));
        }

        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn generate_session_token(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

fn default_avatar_url(user_id: &str) -> String {
    format!("https://api.dicebear.com/9.x/initials/svg?seed={user_id}")
}
