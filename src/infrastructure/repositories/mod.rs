pub mod translation_memory_repository;

// Repositorios PostgreSQL
pub mod pg;

// Re-exportar para facilitar acceso
pub use pg::TranslationPgRepository;
pub use translation_memory_repository::TranslationMemoryRepository;
