mod clients;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod routes;
mod state;
mod ws;

use std::panic;
use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use db::store::Store;
use docs::ApiDoc;
use routes::create_api_routes;
use state::AppState;

#[tokio::main]
async fn main() {
    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info level, but allow debug for our app
            "codepair_server=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });

    // Connect to the database and apply the schema
    let Some(db_url) = config.db_url.clone() else {
        error!("DB_URL must be set");
        std::process::exit(1);
    };
    let store = match Store::connect(&db_url).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = store.ensure_schema().await {
        error!("Failed to apply database schema: {}", e);
        std::process::exit(1);
    }

    if config.runner_url.is_none() {
        warn!("No runner URL configured - code execution endpoints will be unavailable");
    }

    let cors = cors_layer(config.cors_origins.as_deref());
    let state = Arc::new(AppState::new(config.clone(), store));

    // Combine all routes
    let app = Router::new()
        .merge(create_api_routes(state))
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add tracing layer
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", config.server_address()));

    info!("Server running on http://{}", config.server_address());
    info!(
        "WebSocket available at ws://{}/ws/rooms/{{room_id}}",
        config.server_address()
    );
    info!(
        "Swagger UI available at http://{}/swagger",
        config.server_address()
    );

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}

/// The API is consumed by a browser editor frontend; reflect the configured
/// origins, or stay wide open when none are pinned.
fn cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        None | Some("*") => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        Some(list) => {
            let origins: Vec<HeaderValue> = list
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}
