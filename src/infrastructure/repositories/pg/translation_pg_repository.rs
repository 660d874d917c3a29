use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::domain::entities::translation::{Translation, TranslationText};
use crate::domain::repositories::translation_repository::{
    TranslationRepository, TranslationRepositoryError, TranslationRepositoryResult, TranslationTransaction,
};

pub struct TranslationPgRepository {
    pool: Arc<PgPool>,
}

impl TranslationPgRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    // Método auxiliar para mapear errores SQL a errores de dominio
    fn map_sqlx_error(err: sqlx::Error) -> TranslationRepositoryError {
        match err {
            sqlx::Error::PoolTimedOut => {
                TranslationRepositoryError::Timeout("Tiempo agotado esperando una conexión".to_string())
            }
            sqlx::Error::Database(db_err) => {
                // 23xxx: violaciones de integridad en PostgreSQL (NOT NULL, UNIQUE...)
                if db_err.code().map_or(false, |code| code.starts_with("23")) {
                    TranslationRepositoryError::ConstraintViolation(db_err.to_string())
                } else {
                    TranslationRepositoryError::DatabaseError(format!("Error de base de datos: {}", db_err))
                }
            }
            _ => TranslationRepositoryError::DatabaseError(format!("Error de base de datos: {}", err)),
        }
    }

    fn row_to_translation(row: &PgRow) -> Translation {
        Translation::from_data(row.get("id"), row.get("identifier"), row.get("locale"), row.get("text"))
    }
}

#[async_trait]
impl TranslationRepository for TranslationPgRepository {
    async fn begin(&self) -> TranslationRepositoryResult<Box<dyn TranslationTransaction>> {
        let tx = self.pool.begin().await.map_err(Self::map_sqlx_error)?;
        Ok(Box::new(TranslationPgTransaction { tx }))
    }

    async fn find_by_identifier_and_locale(
        &self,
        identifier: i32,
        locale: &str,
    ) -> TranslationRepositoryResult<Option<Translation>> {
        let row = sqlx::query(
            r#"
            SELECT id, identifier, locale, text
            FROM translations
            WHERE identifier = $1 AND locale = $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .bind(locale)
        .fetch_optional(&*self.pool)
        .await
        .map_err(Self::map_sqlx_error)?;

        Ok(row.as_ref().map(Self::row_to_translation))
    }

    async fn find_all_by_identifier(&self, identifier: i32) -> TranslationRepositoryResult<Vec<Translation>> {
        let rows = sqlx::query(
            r#"
            SELECT id, identifier, locale, text
            FROM translations
            WHERE identifier = $1
            ORDER BY id
            "#,
        )
        .bind(identifier)
        .fetch_all(&*self.pool)
        .await
        .map_err(Self::map_sqlx_error)?;

        Ok(rows.iter().map(Self::row_to_translation).collect())
    }

    async fn find_all_by_identifier_in(
        &self,
        identifiers: &HashSet<i32>,
    ) -> TranslationRepositoryResult<Vec<Translation>> {
        let identifiers: Vec<i32> = identifiers.iter().copied().collect();
        let rows = sqlx::query(
            r#"
            SELECT id, identifier, locale, text
            FROM translations
            WHERE identifier = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&identifiers)
        .fetch_all(&*self.pool)
        .await
        .map_err(Self::map_sqlx_error)?;

        Ok(rows.iter().map(Self::row_to_translation).collect())
    }

    async fn find_all_by_ids(&self, ids: &[i64]) -> TranslationRepositoryResult<Vec<Translation>> {
        let rows = sqlx::query(
            r#"
            SELECT id, identifier, locale, text
            FROM translations
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&*self.pool)
        .await
        .map_err(Self::map_sqlx_error)?;

        Ok(rows.iter().map(Self::row_to_translation).collect())
    }

    async fn exists_by_identifier(&self, identifier: i32) -> TranslationRepositoryResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM translations WHERE identifier = $1)")
            .bind(identifier)
            .fetch_one(&*self.pool)
            .await
            .map_err(Self::map_sqlx_error)
    }

    async fn find_text(
        &self,
        identifier: i32,
        locale: &str,
        default_locale: &str,
    ) -> TranslationRepositoryResult<Option<String>> {
        // Duplicate locale rows resolve to the oldest one
        let query = if locale == default_locale {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT t.text
                FROM translations t
                WHERE t.identifier = $1 AND t.locale = $2
                ORDER BY t.id
                LIMIT 1
                "#,
            )
            .bind(identifier)
            .bind(default_locale)
        } else {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT COALESCE(t2.text, t1.text)
                FROM translations t1
                LEFT JOIN translations t2 ON (t2.identifier = t1.identifier AND t2.locale = $2)
                WHERE t1.identifier = $1 AND t1.locale = $3
                ORDER BY t1.id, t2.id
                LIMIT 1
                "#,
            )
            .bind(identifier)
            .bind(locale)
            .bind(default_locale)
        };

        query.fetch_optional(&*self.pool).await.map_err(Self::map_sqlx_error)
    }

    async fn find_texts(
        &self,
        identifiers: &HashSet<i32>,
        locale: &str,
        default_locale: &str,
    ) -> TranslationRepositoryResult<Vec<TranslationText>> {
        let identifiers: Vec<i32> = identifiers.iter().copied().collect();
        let query = if locale == default_locale {
            sqlx::query(
                r#"
                SELECT DISTINCT ON (t.identifier) t.identifier, t.text
                FROM translations t
                WHERE t.locale = $2 AND t.identifier = ANY($1)
                ORDER BY t.identifier, t.id
                "#,
            )
            .bind(&identifiers)
            .bind(default_locale)
        } else {
            sqlx::query(
                r#"
                SELECT DISTINCT ON (t1.identifier) t1.identifier, COALESCE(t2.text, t1.text) AS text
                FROM translations t1
                LEFT JOIN translations t2 ON (t2.identifier = t1.identifier AND t2.locale = $2)
                WHERE t1.locale = $3 AND t1.identifier = ANY($1)
                ORDER BY t1.identifier, t1.id, t2.id
                "#,
            )
            .bind(&identifiers)
            .bind(locale)
            .bind(default_locale)
        };

        let rows = query.fetch_all(&*self.pool).await.map_err(Self::map_sqlx_error)?;

        Ok(rows
            .iter()
            .map(|row| TranslationText {
                identifier: row.get("identifier"),
                text: row.get("text"),
            })
            .collect())
    }
}

/// Unidad de trabajo respaldada por una transacción de PostgreSQL.
/// Si se descarta sin `commit`, sqlx hace rollback automáticamente.
struct TranslationPgTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TranslationTransaction for TranslationPgTransaction {
    async fn save(&mut self, translation: Translation) -> TranslationRepositoryResult<Translation> {
        if let Some(id) = translation.id() {
            sqlx::query("UPDATE translations SET text = $2 WHERE id = $1")
                .bind(id)
                .bind(translation.text())
                .execute(&mut *self.tx)
                .await
                .map_err(TranslationPgRepository::map_sqlx_error)?;
            return Ok(translation);
        }

        // COALESCE keeps a caller-supplied identifier and draws from the sequence otherwise
        let row = sqlx::query(
            r#"
            INSERT INTO translations (identifier, locale, text)
            VALUES (COALESCE($1, nextval('translations_identifier_seq')::INTEGER), $2, $3)
            RETURNING id, identifier
            "#,
        )
        .bind(translation.identifier())
        .bind(translation.locale())
        .bind(translation.text())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(TranslationPgRepository::map_sqlx_error)?;

        Ok(translation.persisted(row.get("id"), row.get("identifier")))
    }

    async fn find_by_identifier_and_locale(
        &mut self,
        identifier: i32,
        locale: &str,
    ) -> TranslationRepositoryResult<Option<Translation>> {
        let row = sqlx::query(
            r#"
            SELECT id, identifier, locale, text
            FROM translations
            WHERE identifier = $1 AND locale = $2
            ORDER BY id
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(identifier)
        .bind(locale)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(TranslationPgRepository::map_sqlx_error)?;

        Ok(row.as_ref().map(TranslationPgRepository::row_to_translation))
    }

    async fn find_all_by_identifier(&mut self, identifier: i32) -> TranslationRepositoryResult<Vec<Translation>> {
        let rows = sqlx::query(
            r#"
            SELECT id, identifier, locale, text
            FROM translations
            WHERE identifier = $1
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(identifier)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(TranslationPgRepository::map_sqlx_error)?;

        Ok(rows.iter().map(TranslationPgRepository::row_to_translation).collect())
    }

    async fn exists_by_identifier(&mut self, identifier: i32) -> TranslationRepositoryResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM translations WHERE identifier = $1)")
            .bind(identifier)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(TranslationPgRepository::map_sqlx_error)
    }

    async fn delete_all(&mut self, translations: &[Translation]) -> TranslationRepositoryResult<()> {
        let ids: Vec<i64> = translations.iter().filter_map(Translation::id).collect();
        if ids.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM translations WHERE id = ANY($1)")
            .bind(&ids)
            .execute(&mut *self.tx)
            .await
            .map_err(TranslationPgRepository::map_sqlx_error)?;

        Ok(())
    }

    async fn delete_all_by_identifier(&mut self, identifier: i32) -> TranslationRepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM translations WHERE identifier = $1")
            .bind(identifier)
            .execute(&mut *self.tx)
            .await
            .map_err(TranslationPgRepository::map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_by_identifier_and_locale(
        &mut self,
        identifier: i32,
        locale: &str,
    ) -> TranslationRepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM translations WHERE identifier = $1 AND locale = $2")
            .bind(identifier)
            .bind(locale)
            .execute(&mut *self.tx)
            .await
            .map_err(TranslationPgRepository::map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> TranslationRepositoryResult<()> {
        self.tx.commit().await.map_err(TranslationPgRepository::map_sqlx_error)
    }
}
