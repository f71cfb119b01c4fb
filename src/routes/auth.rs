/// Authentication Routes
///
/// Login, token refresh, logout and the current administrator's profile.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthService, Claims};
use crate::domain::{AdministratorView, Role};
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext, ValidationError};
use crate::store::CredentialStore;
use crate::validators::{validate_email, validate_login_password};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned on a successful login
#[derive(Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub role: Role,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Returned on a successful refresh; no new refresh token is issued
#[derive(Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

fn require_refresh_token(token: &str) -> Result<&str, AppError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "refresh_token".to_string(),
        )));
    }
    Ok(token)
}

/// POST /administrators/login
///
/// # Errors
/// - 400: Malformed email or empty password
/// - 401: Unknown email, inactive account or wrong password (same response)
/// - 500/503: Store failure
pub async fn login(
    form: web::Json<LoginRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("administrator_login");

    validate_email(&form.email)?;
    validate_login_password(&form.password)?;

    let outcome = match auth.login(&form.email, &form.password).await {
        Ok(Some(outcome)) => outcome,
        Ok(None) => return Err(AppError::Auth(AuthError::InvalidCredentials)),
        Err(e) => {
            context.log_error(&e);
            return Err(e);
        }
    };

    tracing::info!(
        request_id = %context.request_id,
        administrator_id = outcome.administrator.id,
        "Administrator logged in"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        email: outcome.administrator.email,
        role: outcome.administrator.role,
        access_token: outcome.access_token,
        refresh_token: outcome.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: auth.issuer().access_token_expiry(),
    }))
}

/// POST /administrators/refresh
///
/// Exchanges a refresh token for a new access token. Each refresh token can
/// be redeemed once.
///
/// # Errors
/// - 400: Empty refresh token
/// - 401: Token unknown, used, revoked or expired; or owner inactive
pub async fn refresh(
    form: web::Json<RefreshRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");
    let token = require_refresh_token(&form.refresh_token)?;

    let access_token = auth.refresh(token).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    tracing::info!(request_id = %context.request_id, "Access token refreshed");

    Ok(HttpResponse::Ok().json(AccessTokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: auth.issuer().access_token_expiry(),
    }))
}

/// POST /administrators/logout
///
/// Revokes one of the caller's refresh tokens. Requires a valid access token.
pub async fn logout(
    claims: web::ReqData<Claims>,
    form: web::Json<RefreshRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let administrator_id = claims.administrator_id()?;
    let context = ErrorContext::new("administrator_logout").with_administrator_id(administrator_id);
    let token = require_refresh_token(&form.refresh_token)?;

    auth.logout(administrator_id, token).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /administrators/me
pub async fn get_current_administrator(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn CredentialStore>,
) -> Result<HttpResponse, AppError> {
    let administrator_id = claims.administrator_id()?;

    let administrator = store
        .find_administrator_by_id(administrator_id)
        .await?
        .filter(|administrator| administrator.is_active)
        .ok_or_else(|| {
            AppError::Database(DatabaseError::NotFound("Administrator not found".to_string()))
        })?;

    Ok(HttpResponse::Ok().json(AdministratorView::from(&administrator)))
}
