// src/auth/guard.rs
use super::token::{Claims, TokenService};
use crate::types::{Profile, Role};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use tracing::warn;

/// Cookie set at login for clients that predate bearer tokens.
pub const LEGACY_TOKEN_COOKIE: &str = "token";

/// Claims of a request carrying a valid session token.
///
/// The token is read from `Authorization: Bearer <token>`. Only when that
/// header is absent is the legacy `token` cookie consulted.
#[derive(Debug)]
pub struct AuthenticatedAccount {
    pub claims: Claims,
}

impl AuthenticatedAccount {
    pub fn account_id(&self) -> i64 {
        self.claims.account_id
    }

    pub fn username(&self) -> &str {
        &self.claims.username
    }

    pub fn role(&self) -> Role {
        self.claims.user_type
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.claims.profile.as_ref()
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    Forbidden,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization token required",
            AuthError::InvalidToken => "Invalid authorization token format",
            AuthError::TokenVerificationFailed => "Token verification failed",
            AuthError::Forbidden => "This action is not available for your account type",
        }
    }
}

fn extract_token(req: &Request<'_>) -> Result<Option<String>, AuthError> {
    match req.headers().get_one("Authorization") {
        Some(header) => match header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
            _ => Err(AuthError::InvalidToken),
        },
        None => Ok(req
            .cookies()
            .get(LEGACY_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())),
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedAccount {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let tokens = match req.guard::<&State<TokenService>>().await {
            Outcome::Success(tokens) => tokens,
            Outcome::Error((status, _)) => {
                return Outcome::Error((status, AuthError::TokenVerificationFailed))
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let token = match extract_token(req) {
            Ok(Some(token)) => token,
            Ok(None) => return Outcome::Error((Status::Unauthorized, AuthError::MissingToken)),
            Err(e) => {
                warn!("Invalid Authorization header format");
                return Outcome::Error((Status::Unauthorized, e));
            }
        };

        match tokens.verify(&token) {
            Ok(claims) => Outcome::Success(AuthenticatedAccount { claims }),
            Err(e) => {
                warn!("Token verification failed: {:#}", e);
                Outcome::Error((Status::Unauthorized, AuthError::TokenVerificationFailed))
            }
        }
    }
}

/// Like [`AuthenticatedAccount`] but never rejects the request.
pub struct OptionalAuth {
    pub account: Option<AuthenticatedAccount>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalAuth {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedAccount::from_request(req).await {
            Outcome::Success(account) => Outcome::Success(OptionalAuth {
                account: Some(account),
            }),
            _ => Outcome::Success(OptionalAuth { account: None }),
        }
    }
}
