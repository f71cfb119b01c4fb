/// Vehicle routes
///
/// Listing is open to any authenticated administrator; create and read by
/// id need `Adm` or `Editor`; update and delete need `Adm`.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::Claims;
use crate::domain::{PageRequest, Role, VehicleFilter};
use crate::error::{AppError, DatabaseError, ErrorContext};
use crate::store::VehicleStore;
use crate::validators::validate_vehicle;

#[derive(Deserialize)]
pub struct VehicleQuery {
    pub page: Option<i64>,
    pub name: Option<String>,
    pub brand: Option<String>,
}

#[derive(Deserialize)]
pub struct VehicleRequest {
    pub name: String,
    pub brand: String,
    pub year: i32,
}

fn not_found() -> AppError {
    AppError::Database(DatabaseError::NotFound("Vehicle not found".to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /vehicles?page=&name=&brand=
pub async fn list_vehicles(
    query: web::Query<VehicleQuery>,
    store: web::Data<dyn VehicleStore>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let filter = VehicleFilter {
        name: non_blank(query.name),
        brand: non_blank(query.brand),
    };

    let page = store
        .list_vehicles(&filter, PageRequest::new(query.page))
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /vehicles/{id}
pub async fn get_vehicle(
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    store: web::Data<dyn VehicleStore>,
) -> Result<HttpResponse, AppError> {
    claims.require_role(&[Role::Admin, Role::Editor])?;

    let vehicle = store
        .find_vehicle(path.into_inner())
        .await?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(vehicle))
}

/// POST /vehicles
pub async fn create_vehicle(
    claims: web::ReqData<Claims>,
    form: web::Json<VehicleRequest>,
    store: web::Data<dyn VehicleStore>,
) -> Result<HttpResponse, AppError> {
    claims.require_role(&[Role::Admin, Role::Editor])?;
    let context = ErrorContext::new("vehicle_create");

    let data = validate_vehicle(&form.name, &form.brand, form.year)?;
    let vehicle = store.insert_vehicle(data, &claims.email).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    tracing::info!(request_id = %context.request_id, vehicle_id = vehicle.id, "Vehicle created");

    Ok(HttpResponse::Created().json(vehicle))
}

/// PUT /vehicles/{id}
pub async fn update_vehicle(
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    form: web::Json<VehicleRequest>,
    store: web::Data<dyn VehicleStore>,
) -> Result<HttpResponse, AppError> {
    claims.require_role(&[Role::Admin])?;
    let id = path.into_inner();

    let data = validate_vehicle(&form.name, &form.brand, form.year)?;
    let vehicle = store
        .update_vehicle(id, data, &claims.email)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(vehicle_id = id, "Vehicle updated");

    Ok(HttpResponse::Ok().json(vehicle))
}

/// DELETE /vehicles/{id}
pub async fn delete_vehicle(
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    store: web::Data<dyn VehicleStore>,
) -> Result<HttpResponse, AppError> {
    claims.require_role(&[Role::Admin])?;
    let id = path.into_inner();

    if !store.deactivate_vehicle(id, &claims.email).await? {
        return Err(not_found());
    }

    tracing::info!(vehicle_id = id, "Vehicle deactivated");
    Ok(HttpResponse::NoContent().finish())
}
