/// Refresh Token Lifecycle
///
/// A stored refresh token is Active, Used or Invalid; expiry is derived from
/// the clock. Rotation turns one Active token into exactly one new access
/// token and leaves the refresh token Used. No replacement refresh token is
/// issued, so a login session can be refreshed once.

use chrono::Utc;
use std::sync::Arc;

use crate::auth::jwt::TokenIssuer;
use crate::error::{AppError, AuthError};
use crate::store::CredentialStore;

#[derive(Clone)]
pub struct TokenLifecycle {
    store: Arc<dyn CredentialStore>,
    issuer: Arc<TokenIssuer>,
}

impl TokenLifecycle {
    pub fn new(store: Arc<dyn CredentialStore>, issuer: Arc<TokenIssuer>) -> Self {
        Self { store, issuer }
    }

    /// Whether `token` can currently be redeemed
    ///
    /// Missing, used, invalidated and expired tokens all give `false`.
    /// Store failures are returned as errors.
    pub async fn validate(&self, token: &str) -> Result<bool, AppError> {
        let record = self.store.find_refresh_token(token).await?;
        Ok(record.map_or(false, |r| r.is_redeemable_at(Utc::now())))
    }

    /// Exchange a refresh token for a new access token
    ///
    /// # Errors
    /// - `AuthError::TokenInvalid` if the token is not redeemable, or another
    ///   caller redeemed it first
    /// - `AuthError::SubjectMissing` if the owning administrator is gone or inactive
    pub async fn rotate(&self, token: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let record = match self.store.find_refresh_token(token).await? {
            Some(record) if record.is_redeemable_at(now) => record,
            _ => {
                tracing::warn!("Refresh token rejected");
                return Err(AppError::Auth(AuthError::TokenInvalid));
            }
        };

        let administrator = match self
            .store
            .find_administrator_by_id(record.administrator_id)
            .await?
        {
            Some(administrator) if administrator.is_active => administrator,
            _ => {
                tracing::warn!(
                    administrator_id = record.administrator_id,
                    "Refresh token owner missing or inactive"
                );
                return Err(AppError::Auth(AuthError::SubjectMissing));
            }
        };

        if !self.store.mark_refresh_token_used(token, Utc::now()).await? {
            tracing::warn!(
                administrator_id = administrator.id,
                "Refresh token redeemed concurrently"
            );
            return Err(AppError::Auth(AuthError::TokenInvalid));
        }

        self.issuer
            .mint_access(administrator.id, &administrator.email, administrator.role)
    }

    /// Revoke a token (Active -> Invalid). Returns whether it was Active.
    pub async fn revoke(&self, token: &str) -> Result<bool, AppError> {
        let revoked = self.store.invalidate_refresh_token(token).await?;
        if revoked {
            tracing::info!("Refresh token revoked");
        }
        Ok(revoked)
    }
}
