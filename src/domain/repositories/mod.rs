pub mod translation_repository;
