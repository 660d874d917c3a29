pub mod translation_service;
pub mod translation_validation_service;


// Re-exportar para facilitar acceso
pub use translation_service::TranslationService;
pub use translation_validation_service::TranslationValidationService;
