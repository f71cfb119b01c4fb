/// Administrator management routes
///
/// All handlers here require the `Adm` role.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::{hash_password, Claims};
use crate::domain::{
    AdministratorChanges, AdministratorView, NewAdministrator, PageRequest, Role,
};
use crate::error::{AppError, DatabaseError, ErrorContext};
use crate::store::{AdministratorStore, CredentialStore};
use crate::validators::{require_role, validate_email, validate_new_password};

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

#[derive(Deserialize)]
pub struct AdministratorRequest {
    pub email: String,
    pub password: Option<String>,
    pub role: Option<Role>,
}

fn not_found() -> AppError {
    AppError::Database(DatabaseError::NotFound("Administrator not found".to_string()))
}

/// GET /administrators?page=
pub async fn list_administrators(
    claims: web::ReqData<Claims>,
    query: web::Query<PageQuery>,
    store: web::Data<dyn AdministratorStore>,
) -> Result<HttpResponse, AppError> {
    claims.require_role(&[Role::Admin])?;

    let administrators = store
        .list_administrators(PageRequest::new(query.page))
        .await?;
    let views: Vec<AdministratorView> = administrators.iter().map(AdministratorView::from).collect();

    Ok(HttpResponse::Ok().json(views))
}

/// GET /administrators/{id}
pub async fn get_administrator(
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    store: web::Data<dyn CredentialStore>,
) -> Result<HttpResponse, AppError> {
    claims.require_role(&[Role::Admin])?;

    let administrator = store
        .find_administrator_by_id(path.into_inner())
        .await?
        .filter(|administrator| administrator.is_active)
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(AdministratorView::from(&administrator)))
}

/// POST /administrators
///
/// # Errors
/// - 400: Invalid email, password shorter than 6 characters, missing role
/// - 403: Caller is not `Adm`
/// - 409: Email already registered
pub async fn create_administrator(
    claims: web::ReqData<Claims>,
    form: web::Json<AdministratorRequest>,
    store: web::Data<dyn AdministratorStore>,
) -> Result<HttpResponse, AppError> {
    claims.require_role(&[Role::Admin])?;
    let context = ErrorContext::new("administrator_create");
    let form = form.into_inner();

    validate_email(&form.email)?;
    let password = form.password.unwrap_or_default();
    validate_new_password(&password)?;
    let role = require_role(form.role)?;

    let administrator = store
        .insert_administrator(
            NewAdministrator {
                email: form.email,
                password_hash: hash_password(&password)?,
                role,
            },
            &claims.email,
        )
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    tracing::info!(
        request_id = %context.request_id,
        administrator_id = administrator.id,
        role = %administrator.role,
        "Administrator created"
    );

    Ok(HttpResponse::Created().json(AdministratorView::from(&administrator)))
}

/// PUT /administrators/{id}
///
/// The password is only replaced when one is given.
pub async fn update_administrator(
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    form: web::Json<AdministratorRequest>,
    store: web::Data<dyn AdministratorStore>,
) -> Result<HttpResponse, AppError> {
    claims.require_role(&[Role::Admin])?;
    let id = path.into_inner();
    let context = ErrorContext::new("administrator_update").with_administrator_id(id);
    let form = form.into_inner();

    validate_email(&form.email)?;
    let role = require_role(form.role)?;
    let password_hash = match form.password.as_deref() {
        Some(password) => {
            validate_new_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let administrator = store
        .update_administrator(
            id,
            AdministratorChanges {
                email: form.email,
                role,
                password_hash,
            },
            &claims.email,
        )
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?
        .ok_or_else(not_found)?;

    tracing::info!(request_id = %context.request_id, administrator_id = id, "Administrator updated");

    Ok(HttpResponse::Ok().json(AdministratorView::from(&administrator)))
}

/// DELETE /administrators/{id}
///
/// Soft delete: the account is deactivated, its refresh tokens stay stored
/// but can no longer be redeemed.
pub async fn delete_administrator(
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    store: web::Data<dyn AdministratorStore>,
) -> Result<HttpResponse, AppError> {
    claims.require_role(&[Role::Admin])?;
    let id = path.into_inner();

    if !store.deactivate_administrator(id, &claims.email).await? {
        return Err(not_found());
    }

    tracing::info!(administrator_id = id, "Administrator deactivated");
    Ok(HttpResponse::NoContent().finish())
}
