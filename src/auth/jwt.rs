/// Token Issuer
///
/// Mints HS256-signed access tokens and opaque random refresh tokens.
/// The signing secret is handed over once at construction and kept as an
/// immutable key pair for the lifetime of the process.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::domain::Role;
use crate::error::{AppError, AuthError, ConfigError};

/// Bytes of entropy in every refresh token.
pub const REFRESH_TOKEN_BYTES: usize = 64;

const RECOMMENDED_SECRET_BYTES: usize = 32;

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Build the issuer from configuration
    ///
    /// # Errors
    /// `ConfigError::MissingRequired` when the secret is absent or blank.
    /// Callers treat this as fatal at startup.
    pub fn new(config: &JwtSettings) -> Result<Self, AppError> {
        let secret = config.secret.as_str();
        if secret.trim().is_empty() {
            return Err(AppError::Config(ConfigError::MissingRequired(
                "jwt.secret".to_string(),
            )));
        }
        if config.access_token_expiry <= 0 {
            return Err(AppError::Config(ConfigError::InvalidValue(
                "jwt.access_token_expiry must be positive".to_string(),
            )));
        }
        if secret.len() < RECOMMENDED_SECRET_BYTES {
            tracing::warn!(
                length = secret.len(),
                recommended = RECOMMENDED_SECRET_BYTES,
                "JWT secret is shorter than recommended"
            );
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry: config.access_token_expiry,
        })
    }

    /// Access token lifetime in seconds
    pub fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    /// Mint a signed access token for an administrator
    ///
    /// Every call embeds a new `jti`, so two tokens for the same
    /// administrator never compare equal.
    pub fn mint_access(
        &self,
        administrator_id: i64,
        email: &str,
        role: Role,
    ) -> Result<String, AppError> {
        let claims = Claims::new(
            administrator_id,
            email.to_string(),
            role,
            self.access_token_expiry,
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Mint an opaque refresh token: 64 random bytes, base64 encoded
    pub fn mint_refresh(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        STANDARD.encode(bytes)
    }

    /// Verify signature and expiry of an access token and return its claims
    ///
    /// # Errors
    /// `AuthError::TokenInvalid` if the token is malformed, tampered with,
    /// signed with another secret, expired, or carries an unknown role.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!("JWT validation error: {}", e);
                AppError::Auth(AuthError::TokenInvalid)
            })
    }
}
