use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::json;

use crate::application::services::translation_validation_service::TranslationValidationService;
use crate::common::collections::swap_map_keys;
use crate::common::errors::{DomainError, ErrorCode, Result};
use crate::domain::entities::translation::Translation;
use crate::domain::repositories::translation_repository::{TranslationRepository, TranslationTransaction};

const ENTITY: &str = "Translation";

/// Creates, updates, reads and deletes multilingual translations.
///
/// Every operation that writes runs inside one repository transaction, so a
/// failure at any step leaves nothing behind. Reads go to committed data and
/// fall back to the application locale when the requested one has no text.
pub struct TranslationService {
    application_locale: String,
    translation_repository: Arc<dyn TranslationRepository>,
    validation_service: TranslationValidationService,
}

impl TranslationService {
    pub fn new(application_locale: impl Into<String>, translation_repository: Arc<dyn TranslationRepository>) -> Self {
        Self {
            application_locale: application_locale.into(),
            translation_repository,
            validation_service: TranslationValidationService::new(),
        }
    }

    pub fn application_locale(&self) -> &str {
        &self.application_locale
    }

    /// Creates a translation in the application locale and returns its identifier.
    pub async fn create_translation(&self, text: &str) -> Result<i32> {
        tracing::debug!("Creando traducción en {}", self.application_locale);

        let mut tx = self.translation_repository.begin().await?;
        let translation = tx.save(Translation::new(&self.application_locale, text)).await?;
        tx.commit().await?;

        let identifier = saved_identifier(&translation)?;
        tracing::info!("Traducción {} creada", identifier);
        Ok(identifier)
    }

    /// Creates one translation in several locales. An empty map creates
    /// nothing and yields `None`.
    pub async fn create_multilingual_translation(&self, locale_text_map: &HashMap<String, String>) -> Result<Option<i32>> {
        self.create_multilingual_translation_with(locale_text_map, false).await
    }

    /// Like [`create_multilingual_translation`](Self::create_multilingual_translation),
    /// but with `is_required` an empty map is rejected instead of ignored.
    pub async fn create_multilingual_translation_with(
        &self,
        locale_text_map: &HashMap<String, String>,
        is_required: bool,
    ) -> Result<Option<i32>> {
        tracing::debug!("Creando traducción multilingüe con {} idiomas", locale_text_map.len());

        let mut tx = self.translation_repository.begin().await?;
        let identifier = self
            .create_multilingual_in(tx.as_mut(), Some(locale_text_map), is_required)
            .await?;
        tx.commit().await?;

        if let Some(identifier) = identifier {
            tracing::info!("Traducción multilingüe {} creada", identifier);
        }
        Ok(identifier)
    }

    /// Creates one translation per field across several locales.
    ///
    /// Required fields must be present in the application locale, optional
    /// ones may be, and nothing else is accepted. A field may only appear in
    /// another locale if the application locale has it too.
    pub async fn create_multilingual_translations(
        &self,
        locale_field_texts_map: &HashMap<String, HashMap<String, String>>,
        required_fields: &HashSet<String>,
        optional_fields: &HashSet<String>,
    ) -> Result<HashMap<String, i32>> {
        tracing::debug!("Creando traducciones por campo en {} idiomas", locale_field_texts_map.len());

        if locale_field_texts_map.is_empty() && required_fields.is_empty() {
            return Ok(HashMap::new());
        }

        let validation = &self.validation_service;
        validation.validate_if_translations_in_locale_exist(Some(locale_field_texts_map), &self.application_locale)?;

        // Make a copy to avoid modifying the passed argument
        let mut other_locales = locale_field_texts_map.clone();
        let application_field_texts = other_locales.remove(&self.application_locale).unwrap_or_default();

        validation.validate_if_translations_have_required_fields(&application_field_texts, required_fields)?;
        validation.validate_if_translations_contain_only_expected_fields(
            &application_field_texts,
            required_fields,
            optional_fields,
        )?;
        validation.validate_if_field_is_not_defined_if_not_present_in_locale(&other_locales, &application_field_texts)?;

        let mut tx = self.translation_repository.begin().await?;

        let mut field_identifiers = HashMap::with_capacity(application_field_texts.len());
        for (field, text) in &application_field_texts {
            let translation = tx.save(Translation::new(&self.application_locale, text)).await?;
            field_identifiers.insert(field.clone(), saved_identifier(&translation)?);
        }

        let mut translations = Vec::new();
        for (locale, field_texts) in &other_locales {
            for (field, text) in field_texts {
                // presence guaranteed by the field check above
                if let Some(&identifier) = field_identifiers.get(field) {
                    translations.push(Translation::with_identifier(identifier, locale, text));
                }
            }
        }
        if !translations.is_empty() {
            tx.save_all(translations).await?;
        }

        tx.commit().await?;

        tracing::info!("{} traducciones por campo creadas", field_identifiers.len());
        Ok(field_identifiers)
    }

    /// Adds a text in `locale` to an existing translation.
    ///
    /// An existing row in the same locale is not checked for; a second row is
    /// added in that case.
    pub async fn append_translation(&self, identifier: i32, locale: &str, text: &str) -> Result<()> {
        tracing::debug!("Añadiendo {} a la traducción {}", locale, identifier);

        let mut tx = self.translation_repository.begin().await?;
        if !tx.exists_by_identifier(identifier).await? {
            return Err(not_found_identifier(identifier));
        }
        tx.save(Translation::with_identifier(identifier, locale, text)).await?;
        tx.commit().await?;

        tracing::info!("Idioma {} añadido a la traducción {}", locale, identifier);
        Ok(())
    }

    /// Replaces the text of a translation in one locale.
    pub async fn update_translation(&self, identifier: i32, locale: &str, text: &str) -> Result<()> {
        tracing::debug!("Actualizando la traducción {} en {}", identifier, locale);

        let mut tx = self.translation_repository.begin().await?;
        let mut translation = tx
            .find_by_identifier_and_locale(identifier, locale)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(ENTITY, [("identifier", json!(identifier)), ("locale", json!(locale))])
            })?;

        translation.set_text(text);
        tx.save(translation).await?;
        tx.commit().await?;

        tracing::info!("Traducción {} actualizada en {}", identifier, locale);
        Ok(())
    }

    /// Makes the locales of a translation match `locale_text_map` exactly:
    /// changed texts are updated, missing locales deleted, new ones added.
    pub async fn update_multilingual_translation(
        &self,
        identifier: i32,
        locale_text_map: &HashMap<String, String>,
    ) -> Result<()> {
        tracing::debug!("Actualizando traducción multilingüe {}", identifier);

        let mut tx = self.translation_repository.begin().await?;
        self.update_multilingual_in(tx.as_mut(), identifier, Some(locale_text_map)).await?;
        tx.commit().await?;

        tracing::info!("Traducción multilingüe {} actualizada", identifier);
        Ok(())
    }

    /// Updates one translation per field. Fields without an identifier get a
    /// new translation, whose identifier is added to the returned map.
    pub async fn update_multilingual_translations(
        &self,
        field_identifier_map: &HashMap<String, Option<i32>>,
        locale_field_texts_map: &HashMap<String, HashMap<String, String>>,
    ) -> Result<HashMap<String, Option<i32>>> {
        tracing::debug!("Actualizando {} traducciones por campo", field_identifier_map.len());

        let mut result = field_identifier_map.clone();
        let field_locale_texts_map = swap_map_keys(locale_field_texts_map);

        let mut tx = self.translation_repository.begin().await?;
        for (field, identifier) in field_identifier_map {
            let locale_texts = field_locale_texts_map.get(field);
            match identifier {
                None => {
                    let created = self.create_multilingual_in(tx.as_mut(), locale_texts, false).await?;
                    if created.is_some() {
                        result.insert(field.clone(), created);
                    }
                }
                Some(identifier) => {
                    self.update_multilingual_in(tx.as_mut(), *identifier, locale_texts).await?;
                }
            }
        }
        tx.commit().await?;

        tracing::info!("{} traducciones por campo actualizadas", field_identifier_map.len());
        Ok(result)
    }

    /// Text of a translation in `locale`, or in the application locale when
    /// `locale` has none.
    pub async fn find_text_by_identifier_and_locale(&self, identifier: i32, locale: &str) -> Result<String> {
        tracing::debug!("Buscando la traducción {} en {}", identifier, locale);

        let text = self
            .translation_repository
            .find_text(identifier, locale, &self.application_locale)
            .await?;

        text.ok_or_else(|| {
            let locales = if locale == self.application_locale {
                json!([locale])
            } else {
                json!([locale, self.application_locale])
            };
            DomainError::not_found(ENTITY, [("identifier", json!(identifier)), ("locale", locales)])
        })
    }

    /// Texts of several translations in `locale`, each falling back to the
    /// application locale. Unknown identifiers are left out.
    pub async fn find_all_identifier_and_text_by_identifiers_and_locale<I>(
        &self,
        identifiers: I,
        locale: &str,
    ) -> Result<HashMap<i32, String>>
    where
        I: IntoIterator<Item = i32>,
    {
        let identifiers: HashSet<i32> = identifiers.into_iter().collect();
        if identifiers.is_empty() {
            return Ok(HashMap::new());
        }
        tracing::debug!("Buscando {} traducciones en {}", identifiers.len(), locale);

        let texts = self
            .translation_repository
            .find_texts(&identifiers, locale, &self.application_locale)
            .await?;

        Ok(texts.into_iter().map(|t| (t.identifier, t.text)).collect())
    }

    /// Same as [`find_all_identifier_and_text_by_identifiers_and_locale`](Self::find_all_identifier_and_text_by_identifiers_and_locale),
    /// taking the identifiers from arbitrary items through `mapper`.
    pub async fn find_all_identifier_and_text_by_identifiers_and_locale_with<T, F>(
        &self,
        items: impl IntoIterator<Item = T>,
        mapper: F,
        locale: &str,
    ) -> Result<HashMap<i32, String>>
    where
        F: FnMut(T) -> i32,
    {
        let identifiers: HashSet<i32> = items.into_iter().map(mapper).collect();
        self.find_all_identifier_and_text_by_identifiers_and_locale(identifiers, locale)
            .await
    }

    /// Deletes a translation in every locale. Unknown identifiers are ignored.
    pub async fn delete_all_translation_by(&self, identifier: i32) -> Result<()> {
        tracing::debug!("Eliminando la traducción {}", identifier);

        let mut tx = self.translation_repository.begin().await?;
        let deleted = tx.delete_all_by_identifier(identifier).await?;
        tx.commit().await?;

        tracing::info!("Traducción {} eliminada ({} filas)", identifier, deleted);
        Ok(())
    }

    /// Deletes a translation in one locale other than the application locale.
    pub async fn delete_translation_by_identifier_and_locale(&self, identifier: i32, locale: &str) -> Result<()> {
        // Prevent deletion of the translation in the default application locale
        if locale == self.application_locale {
            tracing::warn!("Intento de eliminar la traducción {} en el idioma de la aplicación", identifier);
            return Err(DomainError::invalid_request(
                ENTITY,
                ErrorCode::ApplicationLocaleTranslationDeletion,
                [("identifier", json!(identifier)), ("locale", json!(locale))],
            ));
        }

        let mut tx = self.translation_repository.begin().await?;
        let deleted = tx.delete_by_identifier_and_locale(identifier, locale).await?;
        tx.commit().await?;

        tracing::info!("Traducción {} eliminada en {} ({} filas)", identifier, locale, deleted);
        Ok(())
    }

    async fn create_multilingual_in(
        &self,
        tx: &mut dyn TranslationTransaction,
        locale_text_map: Option<&HashMap<String, String>>,
        is_required: bool,
    ) -> Result<Option<i32>> {
        if !is_required && locale_text_map.map_or(true, HashMap::is_empty) {
            return Ok(None);
        }

        self.validation_service
            .validate_if_translations_in_locale_exist(locale_text_map, &self.application_locale)?;

        // Make a copy to avoid modifying the passed argument
        let mut other_locales = locale_text_map.cloned().unwrap_or_default();
        let application_text = other_locales.remove(&self.application_locale).unwrap_or_default();

        let translation = tx.save(Translation::new(&self.application_locale, application_text)).await?;
        let identifier = saved_identifier(&translation)?;

        if !other_locales.is_empty() {
            let translations = other_locales
                .into_iter()
                .map(|(locale, text)| Translation::with_identifier(identifier, locale, text))
                .collect();
            tx.save_all(translations).await?;
        }

        Ok(Some(identifier))
    }

    async fn update_multilingual_in(
        &self,
        tx: &mut dyn TranslationTransaction,
        identifier: i32,
        locale_text_map: Option<&HashMap<String, String>>,
    ) -> Result<()> {
        self.validation_service
            .validate_if_translations_in_locale_exist(locale_text_map, &self.application_locale)?;

        let translations = tx.find_all_by_identifier(identifier).await?;
        if translations.is_empty() {
            return Err(not_found_identifier(identifier));
        }

        // Make a copy to avoid modifying the passed argument
        let mut locale_texts_to_create = locale_text_map.cloned().unwrap_or_default();

        let mut translations_to_save = Vec::new();
        let mut translations_to_delete = Vec::new();

        for mut translation in translations {
            match locale_texts_to_create.remove(translation.locale()) {
                Some(text) => {
                    if translation.set_text(text) {
                        translations_to_save.push(translation);
                    }
                }
                None => translations_to_delete.push(translation),
            }
        }

        if !translations_to_delete.is_empty() {
            tx.delete_all(&translations_to_delete).await?;
        }

        translations_to_save.extend(
            locale_texts_to_create
                .into_iter()
                .map(|(locale, text)| Translation::with_identifier(identifier, locale, text)),
        );

        if !translations_to_save.is_empty() {
            tx.save_all(translations_to_save).await?;
        }

        Ok(())
    }
}

fn not_found_identifier(identifier: i32) -> DomainError {
    DomainError::not_found(ENTITY, [("identifier", json!(identifier))])
}

fn saved_identifier(translation: &Translation) -> Result<i32> {
    translation
        .identifier()
        .ok_or_else(|| DomainError::internal_error("Database", "El almacén no asignó un identificador"))
}
