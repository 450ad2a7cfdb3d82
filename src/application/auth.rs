//! Credential authentication, sign-up and session resolution.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::repos::{CreateUserParams, RepoError, UsersRepo, UsersWriteRepo};
use crate::domain::entities::UserRecord;
use crate::domain::error::DomainError;
use crate::domain::inputs::{SignIn, SignUp};
use crate::domain::types::Role;

pub(crate) const METRIC_SIGNIN_TOTAL: &str = "quill_auth_signin_total";
pub(crate) const METRIC_SIGNUP_TOTAL: &str = "quill_auth_signup_total";

/// Caller identity resolved from a verified session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct SignedIn {
    pub session: Session,
    pub user: UserRecord,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("password hashing task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to sign session token: {0}")]
    Sign(String),
}

/// Slow salted password hashing.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}

/// Issues and verifies signed session tokens.
pub trait SessionCodec: Send + Sync {
    fn issue(&self, identity: Identity) -> Result<Session, SessionError>;
    /// `None` for malformed, tampered or expired tokens.
    fn verify(&self, token: &str) -> Option<Identity>;
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("user with this email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Hash(#[from] PasswordHashError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Why a request was refused by the admin guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("no valid session")]
    Unauthenticated,
    #[error("session role `{0}` may not access the admin API")]
    Forbidden(Role),
}

/// Every admin route, read or write, requires the administrative role.
pub fn require_admin(identity: Option<Identity>) -> Result<Identity, AccessError> {
    let identity = identity.ok_or(AccessError::Unauthenticated)?;
    if identity.role.is_admin() {
        Ok(identity)
    } else {
        Err(AccessError::Forbidden(identity.role))
    }
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepo>,
    writer: Arc<dyn UsersWriteRepo>,
    hasher: Arc<dyn PasswordHasher>,
    sessions: Arc<dyn SessionCodec>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UsersRepo>,
        writer: Arc<dyn UsersWriteRepo>,
        hasher: Arc<dyn PasswordHasher>,
        sessions: Arc<dyn SessionCodec>,
    ) -> Self {
        Self {
            users,
            writer,
            hasher,
            sessions,
        }
    }

    /// Map credentials to an identity. Unknown email, a missing hash and a
    /// wrong password all yield `Ok(None)`.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<(Identity, UserRecord)>, AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(None);
        };
        let Some(hash) = user.password_hash.as_deref() else {
            return Ok(None);
        };
        if !self.hasher.verify(password, hash).await? {
            return Ok(None);
        }

        let identity = Identity {
            id: user.id,
            role: user.role,
        };
        Ok(Some((identity, user)))
    }

    pub async fn sign_in(&self, input: SignIn) -> Result<SignedIn, AuthError> {
        input.validate()?;

        let Some((identity, user)) = self.authenticate(&input.email, &input.password).await?
        else {
            counter!(METRIC_SIGNIN_TOTAL, "outcome" => "rejected").increment(1);
            warn!(
                target = "quill::auth",
                email = %input.email,
                "sign-in rejected"
            );
            return Err(AuthError::InvalidCredentials);
        };

        let session = self.sessions.issue(identity)?;
        counter!(METRIC_SIGNIN_TOTAL, "outcome" => "success").increment(1);
        info!(target = "quill::auth", user_id = %user.id, "signed in");
        Ok(SignedIn { session, user })
    }

    /// Creates an account. Every new account is granted `Role::Admin`.
    pub async fn sign_up(&self, input: SignUp) -> Result<UserRecord, AuthError> {
        input.validate()?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(&input.password).await?;
        let params = CreateUserParams {
            name: input.name,
            email: input.email,
            password_hash,
            role: Role::Admin,
        };

        let user = self.writer.create_user(params).await.map_err(|err| match err {
            RepoError::Duplicate { .. } => AuthError::DuplicateEmail,
            other => AuthError::Repo(other),
        })?;

        counter!(METRIC_SIGNUP_TOTAL).increment(1);
        info!(target = "quill::auth", user_id = %user.id, "user signed up");
        Ok(user)
    }

    pub fn resolve_session(&self, token: &str) -> Option<Identity> {
        self.sessions.verify(token)
    }

    /// The account behind a session; `None` once the account is gone.
    pub async fn current_user(&self, identity: Identity) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.users.find_by_id(identity.id).await?)
    }
}
