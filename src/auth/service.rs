/// Authentication Facade
///
/// Login verifies the password, mints an access/refresh pair and persists
/// the refresh record. Refresh hands the token to the lifecycle manager.

use chrono::Duration;
use std::sync::Arc;

use crate::auth::jwt::TokenIssuer;
use crate::auth::password::verify_password;
use crate::auth::refresh_token::TokenLifecycle;
use crate::domain::{Administrator, RefreshTokenRecord};
use crate::error::{AppError, AuthError};
use crate::store::CredentialStore;

/// Successful login: who logged in and the two tokens handed back.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub administrator: Administrator,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    issuer: Arc<TokenIssuer>,
    lifecycle: TokenLifecycle,
    refresh_token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        issuer: Arc<TokenIssuer>,
        refresh_token_ttl: Duration,
    ) -> Self {
        let lifecycle = TokenLifecycle::new(store.clone(), issuer.clone());
        Self {
            store,
            issuer,
            lifecycle,
            refresh_token_ttl,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn lifecycle(&self) -> &TokenLifecycle {
        &self.lifecycle
    }

    /// Authenticate an administrator by exact email and password
    ///
    /// Returns `Ok(None)` for an unknown email, an inactive account or a wrong
    /// password alike; nothing is persisted in that case. bcrypt only runs
    /// when an active account matched the email.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<LoginOutcome>, AppError> {
        let administrator = match self.store.find_administrator_by_email(email).await? {
            Some(administrator) if administrator.is_active => administrator,
            _ => return Ok(None),
        };

        if !verify_password(password, &administrator.password_hash) {
            return Ok(None);
        }

        let access_token = self.issuer.mint_access(
            administrator.id,
            &administrator.email,
            administrator.role,
        )?;
        let refresh_token = self.issuer.mint_refresh();

        let record = RefreshTokenRecord::issue(
            refresh_token.clone(),
            administrator.id,
            self.refresh_token_ttl,
        );
        self.store.save_refresh_token(&record).await?;

        Ok(Some(LoginOutcome {
            administrator,
            access_token,
            refresh_token,
        }))
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        self.lifecycle.rotate(refresh_token).await
    }

    /// Revoke one of the caller's own refresh tokens
    ///
    /// A token owned by someone else is treated like an unknown one.
    pub async fn logout(&self, administrator_id: i64, refresh_token: &str) -> Result<(), AppError> {
        let owned = self
            .store
            .find_refresh_token(refresh_token)
            .await?
            .map_or(false, |record| record.administrator_id == administrator_id);

        if !owned || !self.lifecycle.revoke(refresh_token).await? {
            return Err(AppError::Auth(AuthError::TokenInvalid));
        }

        tracing::info!(administrator_id = administrator_id, "Administrator logged out");
        Ok(())
    }
}
