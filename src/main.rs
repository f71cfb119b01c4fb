use fleet_admin::auth::TokenIssuer;
use fleet_admin::configuration::get_configuration;
use fleet_admin::error::AppError;
use fleet_admin::startup::{run, seed_administrator};
use fleet_admin::store::PgStore;
use fleet_admin::telemetry::init_telemetry;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;

/// Log a startup failure and turn it into the process exit error
fn fatal(stage: &str, error: AppError) -> std::io::Error {
    tracing::error!(error = %error, stage = stage, "Startup failed");
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", stage, error))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = get_configuration().map_err(|e| fatal("configuration", e.into()))?;
    tracing::info!("Configuration loaded successfully");

    // A missing signing secret is fatal
    let token_issuer =
        TokenIssuer::new(&configuration.jwt).map_err(|e| fatal("token issuer", e))?;

    tracing::info!("Attempting to connect to database");

    let pool = PgPoolOptions::new()
        .max_connections(configuration.database.max_connections)
        .connect(&configuration.database.connection_string())
        .await
        .map_err(|e| fatal("database connection", e.into()))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| fatal("migrations", e.into()))?;

    tracing::info!("Database ready");

    let store = Arc::new(PgStore::new(pool));

    if let Some(seed) = &configuration.application.seed_admin {
        seed_administrator(store.as_ref(), seed)
            .await
            .map_err(|e| fatal("seeding", e))?;
    }

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let refresh_token_ttl = chrono::Duration::seconds(configuration.jwt.refresh_token_expiry);
    let server = run(listener, store, token_issuer, refresh_token_ttl)?;

    server.await
}
