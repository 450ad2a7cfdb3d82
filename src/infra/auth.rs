//! Credential primitives: bcrypt password hashes and HS256 session tokens.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::application::auth::{
    Identity, PasswordHashError, PasswordHasher, Session, SessionCodec, SessionError,
};
use crate::domain::types::Role;

pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|err| PasswordHashError::Task(err.to_string()))?
            .map_err(|err| PasswordHashError::Hash(err.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|err| PasswordHashError::Task(err.to_string()))?;

        match outcome {
            Ok(matches) => Ok(matches),
            // A stored value that is not a bcrypt hash never matches.
            Err(bcrypt::BcryptError::InvalidHash(_)) => Ok(false),
            Err(err) => Err(PasswordHashError::Hash(err.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    role: Role,
    iat: i64,
    exp: i64,
}

pub struct JwtSessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: time::Duration,
}

impl JwtSessionCodec {
    pub fn new(secret: &[u8], ttl: std::time::Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: time::Duration::try_from(ttl).unwrap_or(time::Duration::MAX),
        }
    }

    fn issue_at(&self, identity: Identity, now: OffsetDateTime) -> Result<Session, SessionError> {
        let expires_at = now.saturating_add(self.ttl);
        let claims = Claims {
            sub: identity.id,
            role: identity.role,
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| SessionError::Sign(err.to_string()))?;

        Ok(Session { token, expires_at })
    }
}

impl SessionCodec for JwtSessionCodec {
    fn issue(&self, identity: Identity) -> Result<Session, SessionError> {
        self.issue_at(identity, OffsetDateTime::now_utc())
    }

    fn verify(&self, token: &str) -> Option<Identity> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(Identity {
                id: data.claims.sub,
                role: data.claims.role,
            }),
            Err(err) => {
                debug!(target = "quill::auth::session", error = %err, "session token rejected");
                None
            }
        }
    }
}
