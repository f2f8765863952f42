// src/auth/mod.rs
//! Login, password hashing, session tokens and the request guards that
//! read them back.

pub mod authenticator;
pub mod guard;
pub mod password;
pub mod token;

pub use authenticator::{Authenticator, LoginError, LoginOutcome};
pub use guard::{AuthError, AuthenticatedAccount, OptionalAuth, LEGACY_TOKEN_COOKIE};
pub use token::{Claims, TokenService, TokenSubject};
