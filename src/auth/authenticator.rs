// src/auth/authenticator.rs
use super::password::verify_password;
use super::token::{Claims, TokenService, TokenSubject};
use crate::database::AccountStore;
use crate::types::{Account, Profile, Role};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated {
        token: String,
        redirect: &'static str,
        claims: Claims,
    },
    /// Credentials were correct but the account has not been verified yet.
    VerificationRequired { email: String },
}

#[derive(Debug, Error)]
pub enum LoginError {
    /// Unknown identifier or wrong password. Deliberately indistinguishable.
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Invalid user type: {0}")]
    InvalidRole(String),
    #[error("This account is registered as {actual}. Please select the correct user type.")]
    RoleMismatch { actual: String },
    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

pub struct Authenticator {
    store: Arc<dyn AccountStore>,
    tokens: TokenService,
}

impl Authenticator {
    pub fn new(store: Arc<dyn AccountStore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    pub async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
        declared_role: &str,
    ) -> Result<LoginOutcome, LoginError> {
        let account = self
            .store
            .find_account(identifier)
            .await?
            .ok_or(LoginError::InvalidCredentials)?;

        if !verify_password(secret, &account.password_hash)? {
            info!("Rejected login for {}: wrong password", identifier);
            return Err(LoginError::InvalidCredentials);
        }

        if !account.is_verified {
            info!("Login for {} requires verification", account.username);
            return Ok(LoginOutcome::VerificationRequired {
                email: account.email,
            });
        }

        let role = Role::parse(declared_role)
            .ok_or_else(|| LoginError::InvalidRole(declared_role.to_string()))?;

        if account.role_code != role.code() {
            let actual = account
                .role()
                .map(Role::display_name)
                .unwrap_or("Unknown")
                .to_string();
            info!(
                "Rejected login for {}: declared {} but account is {}",
                account.username, role, actual
            );
            return Err(LoginError::RoleMismatch { actual });
        }

        let profile = self.load_profile(&account, role).await?;

        let (token, claims) = self.tokens.issue(TokenSubject {
            account_id: account.id,
            username: &account.username,
            email: &account.email,
            user_type: role,
            role_code: account.role_code,
            profile,
        })?;

        info!("User {} logged in as {}", account.username, role);

        Ok(LoginOutcome::Authenticated {
            token,
            redirect: role.redirect(),
            claims,
        })
    }

    async fn load_profile(&self, account: &Account, role: Role) -> anyhow::Result<Option<Profile>> {
        let profile = match role {
            Role::JobSeeker => self
                .store
                .find_job_seeker_profile(account.id)
                .await?
                .map(Profile::JobSeeker),
            Role::Employee => self
                .store
                .find_employee_profile(account.id)
                .await?
                .map(Profile::Employee),
        };

        if profile.is_none() {
            warn!("No {} profile found for account {}", role, account.id);
        }

        Ok(profile)
    }
}
