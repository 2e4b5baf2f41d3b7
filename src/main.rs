mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use anyhow::Context;
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use db::db::DBClient;
use dotenv::dotenv;
use routes::create_router;
use service::{property_service::PropertyService, report_service::ReportService, seed};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub property_service: Arc<PropertyService>,
    pub report_service: Arc<ReportService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::init()?;

    let level = config
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::DEBUG);
    tracing_subscriber::fmt().with_max_level(level).init();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;
    tracing::info!("Connection to the database is successful");

    let db_client = Arc::new(DBClient::new(pool));
    db_client
        .migrate()
        .await
        .context("Failed to run database migrations")?;

    if config.seed_demo_data {
        seed::seed_demo_data(db_client.as_ref())
            .await
            .context("Failed to seed demo data")?;
    }

    let client_origin = config
        .client_url
        .parse::<HeaderValue>()
        .context("CLIENT_URL is not a valid origin")?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(client_origin))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ]);

    let app_state = AppState {
        env: config.clone(),
        property_service: Arc::new(PropertyService::new(db_client.clone())),
        report_service: Arc::new(ReportService::new(db_client.clone())),
        db_client,
    };

    let app = create_router(Arc::new(app_state)).layer(ServiceBuilder::new().layer(cors));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    tracing::info!("Server is running on http://localhost:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
