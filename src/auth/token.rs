// src/auth/token.rs
use crate::types::{Profile, Role};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Session token payload. The profile is a snapshot taken at login and is
/// not refreshed until the next login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub account_id: i64,
    pub username: String,
    pub email: String,
    pub user_type: Role,
    pub role_code: i64,
    pub profile: Option<Profile>,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Identity fields a token is issued for.
pub struct TokenSubject<'a> {
    pub account_id: i64,
    pub username: &'a str,
    pub email: &'a str,
    pub user_type: Role,
    pub role_code: i64,
    pub profile: Option<Profile>,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    pub fn issue(&self, subject: TokenSubject<'_>) -> Result<(String, Claims)> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: TokenSubject<'_>, now: DateTime<Utc>) -> Result<(String, Claims)> {
        let claims = Claims {
            sub: subject.account_id.to_string(),
            account_id: subject.account_id,
            username: subject.username.to_string(),
            email: subject.email.to_string(),
            user_type: subject.user_type,
            role_code: subject.role_code,
            profile: subject.profile,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to sign session token")?;

        Ok((token, claims))
    }

    /// Check signature and expiry and return the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .context("Invalid session token")?;
        Ok(data.claims)
    }
}
