pub mod translation_dto;
