mod api;
mod config;
mod database;
mod middleware;
mod models;
mod repository;
mod services;
mod state;
mod utils;

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::services::StripeClient;
use crate::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Hall Server...");
    log::info!("📊 Database: {}", config.database_name);

    let db = database::MongoDB::new(&config.mongodb_uri, &config.database_name)
        .await
        .map_err(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string())
        })?;
    log::info!("✅ MongoDB connected successfully");

    let gateway = StripeClient::new(config.stripe_secret_key.clone(), config.stripe_api_base.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let state = web::Data::new(AppState::from_mongo(&db, Arc::new(gateway), &config));

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", config.host, config.port);

    let openapi = api::swagger::ApiDoc::openapi();

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()))
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    log::info!("👋 Server stopped, closing MongoDB connections");
    db.shutdown().await;

    Ok(())
}
