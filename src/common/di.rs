use std::sync::Arc;

use anyhow::Result;

use crate::application::services::translation_service::TranslationService;
use crate::common::config::AppConfig;
use crate::common::db::create_database_pool;
use crate::domain::repositories::translation_repository::TranslationRepository;
use crate::infrastructure::repositories::pg::TranslationPgRepository;
use crate::infrastructure::repositories::translation_memory_repository::TranslationMemoryRepository;

/// Estado global de la aplicación para inyección de dependencias
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub translation_service: Arc<TranslationService>,
}

impl AppState {
    /// Construye los servicios a partir de la configuración.
    ///
    /// With a database URL translations live in PostgreSQL, otherwise in memory.
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        let repository: Arc<dyn TranslationRepository> = if config.database.connection_string.is_some() {
            let pool = create_database_pool(&config).await?;
            tracing::info!("Repositorio de traducciones PostgreSQL inicializado");
            Arc::new(TranslationPgRepository::new(Arc::new(pool)))
        } else {
            tracing::warn!("DATABASE_URL no configurada, las traducciones se guardan en memoria");
            Arc::new(TranslationMemoryRepository::with_identifier_start(config.identifier_start))
        };

        Ok(Self::with_repository(config, repository))
    }

    pub fn with_repository(config: AppConfig, repository: Arc<dyn TranslationRepository>) -> Self {
        let translation_service = Arc::new(TranslationService::new(config.application_locale.clone(), repository));
        Self {
            config,
            translation_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backed_state() {
        let config = AppConfig {
            application_locale: "da".to_string(),
            identifier_start: 500,
            ..AppConfig::default()
        };

        let state = AppState::from_config(config).await.unwrap();
        assert_eq!(state.translation_service.application_locale(), "da");
        assert_eq!(state.translation_service.create_translation("Hej").await.unwrap(), 500);
    }
}
