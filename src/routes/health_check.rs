use actix_web::HttpResponse;
use serde_json::json;

pub async fn health_check() -> HttpResponse {
    tracing::debug!("Health check endpoint called");
    HttpResponse::Ok().content_type("text/plain").body("Healthy")
}

pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Vehicle registry API",
        "health": "/health",
    }))
}
