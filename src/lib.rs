// Exportar los módulos principales del proyecto
pub mod common;
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod interfaces;

// Re-exportaciones públicas comunes
pub use application::services::translation_service::TranslationService;
pub use application::services::translation_validation_service::TranslationValidationService;
pub use common::errors::{DomainError, ErrorCode, ErrorKind};
pub use domain::entities::translation::Translation;
pub use domain::repositories::translation_repository::{TranslationRepository, TranslationTransaction};
pub use domain::services::locale_service::{is_locale, is_valid_locale};
pub use infrastructure::repositories::pg::TranslationPgRepository;
pub use infrastructure::repositories::translation_memory_repository::TranslationMemoryRepository;
