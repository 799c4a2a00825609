//! Admin sessions: credential checks at login and token resolution per request.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::repos::{
    AdminUsersRepo, CreateAdminUserParams, CreateSessionParams, RepoError, SessionsRepo,
};
use crate::domain::{entities::AdminUserRecord, types::UserRole};

const TOKEN_PREFIX: &str = "cs";
const MIN_SECRET_LEN: usize = 32;
const MIN_PASSWORD_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session token")]
    Invalid,
    #[error("session expired")]
    Expired,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("password hashing task failed: {0}")]
    Worker(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// The signed-in user attached to an admin request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPrincipal {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl SessionPrincipal {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub principal: SessionPrincipal,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct CreateAdminUserCommand {
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn AdminUsersRepo>,
    sessions: Arc<dyn SessionsRepo>,
    ttl: Duration,
    hash_cost: u32,
}

impl SessionService {
    pub fn new(
        users: Arc<dyn AdminUsersRepo>,
        sessions: Arc<dyn SessionsRepo>,
        ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            ttl,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Override the bcrypt cost for newly created users.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub async fn create_user(
        &self,
        cmd: CreateAdminUserCommand,
    ) -> Result<AdminUserRecord, SessionError> {
        let email = normalize_email(&cmd.email)?;
        if cmd.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SessionError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let cost = self.hash_cost;
        let password = cmd.password;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|err| SessionError::Worker(err.to_string()))??;

        let record = self
            .users
            .create_user(CreateAdminUserParams {
                email,
                password_hash,
                role: cmd.role,
            })
            .await?;

        info!(
            target = "cinder::application::session",
            user_id = %record.id,
            role = %record.role,
            "created admin user"
        );
        Ok(record)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, SessionError> {
        let email = normalize_email(email).map_err(|_| SessionError::InvalidCredentials)?;
        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or(SessionError::InvalidCredentials)?;

        let candidate = password.to_string();
        let stored_hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &stored_hash))
            .await
            .map_err(|err| SessionError::Worker(err.to_string()))??;
        if !verified {
            return Err(SessionError::InvalidCredentials);
        }

        let now = OffsetDateTime::now_utc();
        match self.sessions.delete_expired_sessions(now).await {
            Ok(0) => {}
            Ok(purged) => info!(
                target = "cinder::application::session",
                purged, "purged expired sessions"
            ),
            Err(err) => warn!(
                target = "cinder::application::session",
                error = %err,
                "failed to purge expired sessions"
            ),
        }

        let prefix = Self::generate_prefix();
        let secret = Self::generate_secret();
        let token = format!("{TOKEN_PREFIX}_{prefix}_{secret}");
        let expires_at = now + self.ttl;

        let record = self
            .sessions
            .create_session(CreateSessionParams {
                prefix,
                hashed_secret: Self::hash_secret(&secret),
                user_id: user.id,
                expires_at,
            })
            .await?;

        Ok(IssuedSession {
            token,
            principal: SessionPrincipal {
                session_id: record.id,
                user_id: user.id,
                email: user.email,
                role: user.role,
            },
            expires_at,
        })
    }

    pub async fn authenticate(&self, token: &str) -> Result<SessionPrincipal, SessionError> {
        let parsed = Self::parse_token(token).ok_or(SessionError::Invalid)?;
        let record = self
            .sessions
            .find_session_by_prefix(&parsed.prefix)
            .await?
            .ok_or(SessionError::Invalid)?;

        let hashed_input = Self::hash_secret(&parsed.secret);
        if record.hashed_secret.ct_eq(&hashed_input).unwrap_u8() == 0 {
            return Err(SessionError::Invalid);
        }

        if record.expires_at <= OffsetDateTime::now_utc() {
            return Err(SessionError::Expired);
        }

        Ok(SessionPrincipal {
            session_id: record.id,
            user_id: record.user_id,
            email: record.email,
            role: record.role,
        })
    }

    /// Delete the session behind `token`. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), SessionError> {
        match self.authenticate(token).await {
            Ok(principal) => {
                self.sessions.delete_session(principal.session_id).await?;
                Ok(())
            }
            Err(SessionError::Invalid) | Err(SessionError::Expired) => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn hash_secret(secret: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher.finalize().to_vec()
    }

    fn generate_prefix() -> String {
        Uuid::new_v4().simple().to_string()[..12].to_string()
    }

    fn generate_secret() -> String {
        format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
    }

    fn parse_token(token: &str) -> Option<ParsedToken> {
        let mut parts = token.splitn(3, '_');
        if parts.next()? != TOKEN_PREFIX {
            return None;
        }
        let prefix = parts.next()?;
        let secret = parts.next()?;
        if secret.len() < MIN_SECRET_LEN || prefix.is_empty() {
            return None;
        }
        Some(ParsedToken {
            prefix: prefix.to_string(),
            secret: secret.to_string(),
        })
    }
}

struct ParsedToken {
    prefix: String,
    secret: String,
}

fn normalize_email(input: &str) -> Result<String, SessionError> {
    let email = input.trim().to_ascii_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(email)
    } else {
        Err(SessionError::Validation(format!(
            "`{}` is not a valid email address",
            input.trim()
        )))
    }
}
