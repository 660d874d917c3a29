use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::entities::translation::{Translation, TranslationText};
use crate::domain::repositories::translation_repository::{
    TranslationRepository, TranslationRepositoryError, TranslationRepositoryResult, TranslationTransaction,
};

/// Filas de traducción indexadas por clave de almacenamiento
#[derive(Debug, Clone, Default)]
struct TranslationTable {
    rows: BTreeMap<i64, Translation>,
    next_id: i64,
}

impl TranslationTable {
    fn find(&self, identifier: i32, locale: &str) -> Option<&Translation> {
        self.rows
            .values()
            .find(|t| t.identifier() == Some(identifier) && t.locale() == locale)
    }

    fn find_all(&self, identifier: i32) -> Vec<Translation> {
        self.rows
            .values()
            .filter(|t| t.identifier() == Some(identifier))
            .cloned()
            .collect()
    }

    fn exists(&self, identifier: i32) -> bool {
        self.rows.values().any(|t| t.identifier() == Some(identifier))
    }

    fn text_or_default(&self, identifier: i32, locale: &str, default_locale: &str) -> Option<String> {
        let default_text = self.find(identifier, default_locale)?;
        if locale == default_locale {
            return Some(default_text.text().to_string());
        }
        let text = self.find(identifier, locale).unwrap_or(default_text);
        Some(text.text().to_string())
    }
}

/// In-process translation store.
///
/// Committed rows sit behind a `RwLock` so reads never wait for an open
/// transaction. Writers are serialised by a separate mutex and work on a
/// staged copy that replaces the committed table on commit.
pub struct TranslationMemoryRepository {
    committed: Arc<RwLock<TranslationTable>>,
    writer: Arc<Mutex<()>>,
    identifier_sequence: Arc<AtomicI64>,
}

impl TranslationMemoryRepository {
    pub fn new() -> Self {
        Self::with_identifier_start(1)
    }

    /// Crea un almacén cuya secuencia de identificadores empieza en `start`
    pub fn with_identifier_start(start: i32) -> Self {
        Self {
            committed: Arc::new(RwLock::new(TranslationTable {
                rows: BTreeMap::new(),
                next_id: 1,
            })),
            writer: Arc::new(Mutex::new(())),
            identifier_sequence: Arc::new(AtomicI64::new(i64::from(start))),
        }
    }

    /// Número de filas confirmadas
    pub async fn count(&self) -> usize {
        self.committed.read().await.rows.len()
    }
}

impl Default for TranslationMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationRepository for TranslationMemoryRepository {
    async fn begin(&self) -> TranslationRepositoryResult<Box<dyn TranslationTransaction>> {
        let guard = self.writer.clone().lock_owned().await;
        let staged = self.committed.read().await.clone();
        tracing::trace!("Transacción en memoria iniciada con {} filas", staged.rows.len());

        Ok(Box::new(TranslationMemoryTransaction {
            _writer: guard,
            staged,
            committed: self.committed.clone(),
            identifier_sequence: self.identifier_sequence.clone(),
        }))
    }

    async fn find_by_identifier_and_locale(
        &self,
        identifier: i32,
        locale: &str,
    ) -> TranslationRepositoryResult<Option<Translation>> {
        Ok(self.committed.read().await.find(identifier, locale).cloned())
    }

    async fn find_all_by_identifier(&self, identifier: i32) -> TranslationRepositoryResult<Vec<Translation>> {
        Ok(self.committed.read().await.find_all(identifier))
    }

    async fn find_all_by_identifier_in(
        &self,
        identifiers: &HashSet<i32>,
    ) -> TranslationRepositoryResult<Vec<Translation>> {
        let table = self.committed.read().await;
        Ok(table
            .rows
            .values()
            .filter(|t| t.identifier().map_or(false, |id| identifiers.contains(&id)))
            .cloned()
            .collect())
    }

    async fn find_all_by_ids(&self, ids: &[i64]) -> TranslationRepositoryResult<Vec<Translation>> {
        let table = self.committed.read().await;
        Ok(ids.iter().filter_map(|id| table.rows.get(id).cloned()).collect())
    }

    async fn exists_by_identifier(&self, identifier: i32) -> TranslationRepositoryResult<bool> {
        Ok(self.committed.read().await.exists(identifier))
    }

    async fn find_text(
        &self,
        identifier: i32,
        locale: &str,
        default_locale: &str,
    ) -> TranslationRepositoryResult<Option<String>> {
        Ok(self
            .committed
            .read()
            .await
            .text_or_default(identifier, locale, default_locale))
    }

    async fn find_texts(
        &self,
        identifiers: &HashSet<i32>,
        locale: &str,
        default_locale: &str,
    ) -> TranslationRepositoryResult<Vec<TranslationText>> {
        let table = self.committed.read().await;
        Ok(identifiers
            .iter()
            .filter_map(|&identifier| {
                table
                    .text_or_default(identifier, locale, default_locale)
                    .map(|text| TranslationText { identifier, text })
            })
            .collect())
    }
}

/// Unidad de trabajo sobre una copia de la tabla
struct TranslationMemoryTransaction {
    _writer: OwnedMutexGuard<()>,
    staged: TranslationTable,
    committed: Arc<RwLock<TranslationTable>>,
    identifier_sequence: Arc<AtomicI64>,
}

impl TranslationMemoryTransaction {
    // Hands out every value up to i32::MAX once, then fails like an INTEGER sequence
    fn next_identifier(&self) -> TranslationRepositoryResult<i32> {
        self.identifier_sequence
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (current <= i64::from(i32::MAX)).then_some(current + 1)
            })
            .ok()
            .and_then(|current| i32::try_from(current).ok())
            .ok_or_else(|| {
                TranslationRepositoryError::DatabaseError("Secuencia de identificadores agotada".to_string())
            })
    }
}

#[async_trait]
impl TranslationTransaction for TranslationMemoryTransaction {
    async fn save(&mut self, translation: Translation) -> TranslationRepositoryResult<Translation> {
        let identifier = match translation.identifier() {
            Some(identifier) => identifier,
            None => self.next_identifier()?,
        };
        let id = match translation.id() {
            Some(id) => id,
            None => {
                let id = self.staged.next_id;
                self.staged.next_id += 1;
                id
            }
        };

        let saved = translation.persisted(id, identifier);
        self.staged.rows.insert(id, saved.clone());
        Ok(saved)
    }

    async fn find_by_identifier_and_locale(
        &mut self,
        identifier: i32,
        locale: &str,
    ) -> TranslationRepositoryResult<Option<Translation>> {
        Ok(self.staged.find(identifier, locale).cloned())
    }

    async fn find_all_by_identifier(&mut self, identifier: i32) -> TranslationRepositoryResult<Vec<Translation>> {
        Ok(self.staged.find_all(identifier))
    }

    async fn exists_by_identifier(&mut self, identifier: i32) -> TranslationRepositoryResult<bool> {
        Ok(self.staged.exists(identifier))
    }

    async fn delete_all(&mut self, translations: &[Translation]) -> TranslationRepositoryResult<()> {
        for id in translations.iter().filter_map(Translation::id) {
            self.staged.rows.remove(&id);
        }
        Ok(())
    }

    async fn delete_all_by_identifier(&mut self, identifier: i32) -> TranslationRepositoryResult<u64> {
        let before = self.staged.rows.len();
        self.staged.rows.retain(|_, t| t.identifier() != Some(identifier));
        Ok((before - self.staged.rows.len()) as u64)
    }

    async fn delete_by_identifier_and_locale(
        &mut self,
        identifier: i32,
        locale: &str,
    ) -> TranslationRepositoryResult<u64> {
        let before = self.staged.rows.len();
        self.staged
            .rows
            .retain(|_, t| !(t.identifier() == Some(identifier) && t.locale() == locale));
        Ok((before - self.staged.rows.len()) as u64)
    }

    async fn commit(self: Box<Self>) -> TranslationRepositoryResult<()> {
        let this = *self;
        *this.committed.write().await = this.staged;
        tracing::trace!("Transacción en memoria confirmada");
        Ok(())
    }
}
