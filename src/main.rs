//! OxiTranslations - Multilingual translation service
//!
//! Stores texts grouped under integer identifiers, one row per locale, and
//! serves them with fallback to the configured application locale. The
//! system provides:
//!
//! - Creation of translations in one or many locales, per field or as a whole
//! - Reconciling updates that add, change and remove locales in one step
//! - Single and batch reads with application-locale fallback
//! - PostgreSQL or in-memory storage with transactional writes
//!
//! The architecture follows the Clean/Hexagonal Architecture pattern with:
//!
//! - Domain Layer: Core entities, locale rules and repository interfaces (domain/*)
//! - Application Layer: Validation and translation orchestration (application/*)
//! - Infrastructure Layer: PostgreSQL and in-memory repositories (infrastructure/*)
//! - Interface Layer: API endpoints (interfaces/*)

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oxitranslations::common::{config::AppConfig, di::AppState};
use oxitranslations::interfaces::create_api_routes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = AppConfig::from_env()?;
    tracing::info!("Idioma de la aplicación: {}", config.application_locale);

    let addr = config.server.socket_addr()?;
    let app_state = AppState::from_config(config).await?;

    let app = create_api_routes(app_state.translation_service.clone()).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting OxiTranslations server on http://{}", addr);

    axum::serve(listener, app).await?;

    tracing::info!("Server shutdown completed");

    Ok(())
}
