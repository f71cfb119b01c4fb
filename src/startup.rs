use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::{hash_password, AuthService, TokenIssuer};
use crate::configuration::SeedAdminSettings;
use crate::domain::{NewAdministrator, Role};
use crate::error::AppError;
use crate::logger::LoggerMiddleware;
use crate::middleware::JwtMiddleware;
use crate::routes::{
    create_administrator, create_vehicle, delete_administrator, delete_vehicle,
    get_administrator, get_current_administrator, get_vehicle, health_check, home,
    list_administrators, list_vehicles, login, logout, refresh, update_administrator,
    update_vehicle,
};
use crate::store::{AdministratorStore, CredentialStore, VehicleStore};

/// Build the HTTP server on an already bound listener.
///
/// `store` backs every route; production passes a `PgStore`, tests an
/// `InMemoryStore`.
pub fn run<S>(
    listener: TcpListener,
    store: Arc<S>,
    token_issuer: TokenIssuer,
    refresh_token_ttl: chrono::Duration,
) -> Result<Server, std::io::Error>
where
    S: CredentialStore + AdministratorStore + VehicleStore + 'static,
{
    let token_issuer = Arc::new(token_issuer);

    let credentials: Arc<dyn CredentialStore> = store.clone();
    let administrators: Arc<dyn AdministratorStore> = store.clone();
    let vehicles: Arc<dyn VehicleStore> = store;

    let auth_service = web::Data::new(AuthService::new(
        credentials.clone(),
        token_issuer.clone(),
        refresh_token_ttl,
    ));
    let credentials = web::Data::from(credentials);
    let administrators = web::Data::from(administrators);
    let vehicles = web::Data::from(vehicles);

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware; CORS is outermost so preflights skip auth
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)
            .wrap(Cors::permissive())
            // Shared state
            .app_data(auth_service.clone())
            .app_data(credentials.clone())
            .app_data(administrators.clone())
            .app_data(vehicles.clone())
            // Public routes
            .route("/", web::get().to(home))
            .route("/health", web::get().to(health_check))
            .route("/administrators/login", web::post().to(login))
            .route("/administrators/refresh", web::post().to(refresh))
            // Protected routes
            .service(
                web::scope("/administrators")
                    .wrap(JwtMiddleware::new(token_issuer.clone()))
                    .route("/logout", web::post().to(logout))
                    .route("/me", web::get().to(get_current_administrator))
                    .route("", web::get().to(list_administrators))
                    .route("", web::post().to(create_administrator))
                    .route("/{id}", web::get().to(get_administrator))
                    .route("/{id}", web::put().to(update_administrator))
                    .route("/{id}", web::delete().to(delete_administrator)),
            )
            .service(
                web::scope("/vehicles")
                    .wrap(JwtMiddleware::new(token_issuer.clone()))
                    .route("", web::get().to(list_vehicles))
                    .route("", web::post().to(create_vehicle))
                    .route("/{id}", web::get().to(get_vehicle))
                    .route("/{id}", web::put().to(update_vehicle))
                    .route("/{id}", web::delete().to(delete_vehicle)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Create the configured `Adm` account unless its email is already taken.
///
/// Returns whether an account was created.
pub async fn seed_administrator<S>(store: &S, seed: &SeedAdminSettings) -> Result<bool, AppError>
where
    S: CredentialStore + AdministratorStore,
{
    if store.find_administrator_by_email(&seed.email).await?.is_some() {
        tracing::debug!("Seed administrator already present");
        return Ok(false);
    }

    let administrator = store
        .insert_administrator(
            NewAdministrator {
                email: seed.email.clone(),
                password_hash: hash_password(&seed.password)?,
                role: Role::Admin,
            },
            "system",
        )
        .await?;

    tracing::info!(administrator_id = administrator.id, "Seed administrator created");
    Ok(true)
}
