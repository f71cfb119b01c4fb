/// JWT Claims structure
///
/// Payload of an access token: subject, email, role, a unique token id and
/// the expiry (RFC 7519 `exp`, seconds since the epoch).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Role;
use crate::error::{AppError, AuthError};

/// JWT Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (administrator id)
    pub sub: String,
    /// Administrator email
    pub email: String,
    /// Administrator role
    pub role: Role,
    /// Unique token identifier, fresh for every token
    pub jti: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an administrator expiring `expiry_seconds` from now
    pub fn new(administrator_id: i64, email: String, role: Role, expiry_seconds: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: administrator_id.to_string(),
            email,
            role,
            jti: Uuid::new_v4().to_string(),
            exp: now + expiry_seconds,
        }
    }

    /// Extract the administrator id from the subject
    pub fn administrator_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AppError::Auth(AuthError::TokenInvalid))
    }

    /// Fails with `Forbidden` unless the token's role is one of `allowed`.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            tracing::warn!(
                administrator_id = %self.sub,
                role = %self.role,
                "Role not permitted for operation"
            );
            Err(AppError::Auth(AuthError::Forbidden))
        }
    }
}
