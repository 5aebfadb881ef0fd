//!
//! Job-board backend server.
//! Reads configuration from TOML file (~/.config/job-board/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use job_board::application::{AuthService, ProfileService};
use job_board::domain::UserRepositoryInterface;
use job_board::infrastructure::crypto::jwt::JwtConfig;
use job_board::infrastructure::database::migrator::Migrator;
use job_board::infrastructure::database::repositories::UserRepository;
use job_board::{create_api_router, default_config_path, init_database, AppConfig, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("JOBBOARD_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
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

    info!("Starting job-board backend...");

    // A missing signing secret is a hard startup error.
    if app_cfg.security.jwt_secret.is_empty() {
        error!("JWT signing secret is not set; provide security.jwt_secret or JWT_SECRET");
        return Err("missing JWT signing secret".into());
    }

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        token_ttl_hours: app_cfg.security.token_ttl_hours,
        issuer: app_cfg.security.issuer.clone(),
    };
    info!(
        "JWT configured with {}h token lifetime",
        jwt_config.token_ttl_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig::from_env().unwrap_or_else(|| DatabaseConfig {
        url: app_cfg.database.connection_url(),
    });

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

    // ── Services ───────────────────────────────────────────────
    let repo: Arc<dyn UserRepositoryInterface> = Arc::new(UserRepository::new(db.clone()));
    let auth = Arc::new(AuthService::new(
        Arc::clone(&repo),
        jwt_config,
        app_cfg.security.bcrypt_cost,
    ));
    let profile = Arc::new(ProfileService::new(repo, app_cfg.security.bcrypt_cost));

    let router = create_api_router(auth, profile);

    // ── HTTP server with graceful shutdown ─────────────────────
    let addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Performing final cleanup...");
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Job-board backend shutdown complete");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
