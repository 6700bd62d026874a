//!
//! StudyHub coordination service entry point.
//! Reads configuration from TOML file (~/.config/studygroup-service/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use studyhub::domain::{User, UserRole};
use studyhub::infrastructure::crypto::jwt::JwtConfig;
use studyhub::infrastructure::crypto::password::hash_password;
use studyhub::infrastructure::database::migrator::Migrator;
use studyhub::{
    create_api_router, default_config_path, init_database, AppConfig, DatabaseConfig,
    DatabaseStorage, Storage,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("STUDYHUB_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting StudyHub coordination service...");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    let store: Arc<dyn Storage> = Arc::new(DatabaseStorage::new(db.clone()));

    // One-time idempotent admin bootstrap
    seed_admin(store.as_ref(), &app_cfg).await;

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "studygroup-service".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── REST API ───────────────────────────────────────────────
    let router = create_api_router(store, jwt_config);
    let addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("OpenAPI document at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    }
    info!("StudyHub coordination service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        error!("Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

/// Create the admin account from config if it does not exist yet.
async fn seed_admin(store: &dyn Storage, app_cfg: &AppConfig) {
    match store.get_user_by_email(&app_cfg.admin.email).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            info!("Creating default admin user...");
            let password_hash = match hash_password(&app_cfg.admin.password) {
                Ok(hash) => hash,
                Err(e) => {
                    error!("Failed to hash admin password: {}", e);
                    return;
                }
            };

            let admin = User::new(
                app_cfg.admin.name.clone(),
                app_cfg.admin.email.clone(),
                app_cfg.admin.contact_number.clone(),
                password_hash,
                UserRole::Admin,
            );

            match store.insert_user(admin).await {
                Ok(()) => {
                    info!("Default admin created: {}", app_cfg.admin.email);
                    warn!("Please change the admin password immediately!");
                }
                Err(e) => error!("Failed to create admin user: {}", e),
            }
        }
        Err(e) => error!("Failed to check for existing admin: {}", e),
    }
}
