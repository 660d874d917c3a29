mod translation_pg_repository;

pub use translation_pg_repository::TranslationPgRepository;
