use std::collections::HashSet;

use async_trait::async_trait;

use crate::common::errors::DomainError;
use crate::domain::entities::translation::{Translation, TranslationText};

#[derive(Debug, thiserror::Error)]
pub enum TranslationRepositoryError {
    #[error("Error de base de datos: {0}")]
    DatabaseError(String),

    #[error("Restricción violada: {0}")]
    ConstraintViolation(String),

    #[error("Error de tiempo de espera: {0}")]
    Timeout(String),
}

pub type TranslationRepositoryResult<T> = Result<T, TranslationRepositoryError>;

// Conversión de TranslationRepositoryError a DomainError, conservando el original como fuente
impl From<TranslationRepositoryError> for DomainError {
    fn from(err: TranslationRepositoryError) -> Self {
        let message = err.to_string();
        let domain_error = match &err {
            TranslationRepositoryError::Timeout(_) => DomainError::timeout("Database", message),
            TranslationRepositoryError::DatabaseError(_)
            | TranslationRepositoryError::ConstraintViolation(_) => {
                DomainError::internal_error("Database", message)
            }
        };
        domain_error.with_source(err)
    }
}

/// Persistence contract for translation rows.
///
/// Reads go straight to committed data. Every write happens inside a
/// [`TranslationTransaction`] obtained from [`TranslationRepository::begin`].
#[async_trait]
pub trait TranslationRepository: Send + Sync + 'static {
    /// Abre una unidad de trabajo transaccional
    async fn begin(&self) -> TranslationRepositoryResult<Box<dyn TranslationTransaction>>;

    /// Obtiene la traducción de un identificador en un idioma
    async fn find_by_identifier_and_locale(
        &self,
        identifier: i32,
        locale: &str,
    ) -> TranslationRepositoryResult<Option<Translation>>;

    /// Obtiene todas las variantes de un identificador
    async fn find_all_by_identifier(&self, identifier: i32) -> TranslationRepositoryResult<Vec<Translation>>;

    /// Obtiene todas las variantes de varios identificadores
    async fn find_all_by_identifier_in(
        &self,
        identifiers: &HashSet<i32>,
    ) -> TranslationRepositoryResult<Vec<Translation>>;

    /// Obtiene filas por clave de almacenamiento
    async fn find_all_by_ids(&self, ids: &[i64]) -> TranslationRepositoryResult<Vec<Translation>>;

    /// Comprueba si existe alguna variante del identificador
    async fn exists_by_identifier(&self, identifier: i32) -> TranslationRepositoryResult<bool>;

    /// Text of `identifier` in `locale`, falling back to `default_locale`.
    ///
    /// When `locale == default_locale` only the default row is consulted.
    async fn find_text(
        &self,
        identifier: i32,
        locale: &str,
        default_locale: &str,
    ) -> TranslationRepositoryResult<Option<String>>;

    /// Batch form of [`find_text`](Self::find_text). Identifiers without a
    /// row in `default_locale` are left out of the result.
    async fn find_texts(
        &self,
        identifiers: &HashSet<i32>,
        locale: &str,
        default_locale: &str,
    ) -> TranslationRepositoryResult<Vec<TranslationText>>;
}

/// Atomic unit of work over the translation rows.
///
/// Nothing written through it is visible to other readers until
/// [`commit`](Self::commit) succeeds. Dropping it without committing discards
/// every change.
#[async_trait]
pub trait TranslationTransaction: Send {
    /// Persists a row. A missing identifier is drawn from the shared
    /// identifier sequence; a present one is kept as is.
    async fn save(&mut self, translation: Translation) -> TranslationRepositoryResult<Translation>;

    async fn save_all(&mut self, translations: Vec<Translation>) -> TranslationRepositoryResult<Vec<Translation>> {
        let mut saved = Vec::with_capacity(translations.len());
        for translation in translations {
            saved.push(self.save(translation).await?);
        }
        Ok(saved)
    }

    async fn find_by_identifier_and_locale(
        &mut self,
        identifier: i32,
        locale: &str,
    ) -> TranslationRepositoryResult<Option<Translation>>;

    async fn find_all_by_identifier(&mut self, identifier: i32) -> TranslationRepositoryResult<Vec<Translation>>;

    async fn exists_by_identifier(&mut self, identifier: i32) -> TranslationRepositoryResult<bool>;

    /// Elimina las filas indicadas por su clave de almacenamiento
    async fn delete_all(&mut self, translations: &[Translation]) -> TranslationRepositoryResult<()>;

    /// Elimina todas las variantes de un identificador
    async fn delete_all_by_identifier(&mut self, identifier: i32) -> TranslationRepositoryResult<u64>;

    /// Elimina la variante de un identificador en un idioma
    async fn delete_by_identifier_and_locale(
        &mut self,
        identifier: i32,
        locale: &str,
    ) -> TranslationRepositoryResult<u64>;

    async fn commit(self: Box<Self>) -> TranslationRepositoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::ErrorKind;
    use std::error::Error;

    #[test]
    fn test_repository_error_keeps_source() {
        let err: DomainError = TranslationRepositoryError::ConstraintViolation("text".to_string()).into();

        assert_eq!(err.kind, ErrorKind::InternalError);
        assert!(err.source().is_some());
        assert!(err.message.contains("text"));
    }

    #[test]
    fn test_timeout_maps_to_timeout() {
        let err: DomainError = TranslationRepositoryError::Timeout("pool".to_string()).into();
        assert_eq!(err.kind, ErrorKind::Timeout);
    }
}
