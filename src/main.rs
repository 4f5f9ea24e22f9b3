use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hris_app::api;
use hris_app::config::AppConfig;
use hris_app::database::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hris_app=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HRIS backend");

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded");

    // Initialize database
    let database = Database::new(&config.database_url).await?;
    info!("Database connected");

    // Run migrations
    database.run_migrations().await?;
    info!("Database migrations completed");

    // Build application
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/audit/trail", get(api::audit::get_audit_trail))
        .route("/api/audit/events", post(api::audit::record_event))
        .route("/api/payroll/split-preview", post(api::payroll::split_preview))
        .route(
            "/api/payroll/runs/:run_id/disburse",
            post(api::payroll::disburse_run),
        )
        .route("/status", get(status_endpoint))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state((config.clone(), database));

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "hris-app",
        "timestamp": chrono::Utc::now()
    }))
}

async fn status_endpoint(
    State((config, _database)): State<(AppConfig, Database)>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "hris-app",
        "timestamp": chrono::Utc::now(),
        "server": format!("{}:{}", config.server_host, config.server_port),
    }))
}
