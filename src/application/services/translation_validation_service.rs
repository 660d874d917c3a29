use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::json;

use crate::common::errors::{DomainError, ErrorCode, Result};

const ENTITY: &str = "Translation";

/// Structural checks run before any translation is written.
///
/// Each check returns an `InvalidInput` error carrying its stable code and
/// the offending input.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslationValidationService;

impl TranslationValidationService {
    pub fn new() -> Self {
        Self
    }

    /// Fails unless `locale_map` is present and has an entry for `locale`.
    pub fn validate_if_translations_in_locale_exist<V: Serialize>(
        &self,
        locale_map: Option<&HashMap<String, V>>,
        locale: &str,
    ) -> Result<()> {
        match locale_map {
            Some(map) if map.contains_key(locale) => Ok(()),
            _ => {
                tracing::warn!("Falta la traducción en el idioma de la aplicación: {}", locale);
                Err(DomainError::invalid_request(
                    ENTITY,
                    ErrorCode::NoApplicationLocaleTranslation,
                    [("localeMap", json!(locale_map)), ("locale", json!(locale))],
                ))
            }
        }
    }

    /// Fails if any required field name is not a key of `field_text_map`.
    pub fn validate_if_translations_have_required_fields(
        &self,
        field_text_map: &HashMap<String, String>,
        required_fields: &HashSet<String>,
    ) -> Result<()> {
        if required_fields.iter().all(|field| field_text_map.contains_key(field)) {
            return Ok(());
        }

        tracing::warn!("Faltan campos obligatorios en el idioma de la aplicación");
        Err(DomainError::invalid_request(
            ENTITY,
            ErrorCode::NoRequiredFieldInApplicationLocale,
            [
                ("fieldTextMap", json!(field_text_map)),
                ("requiredFields", json!(sorted(required_fields))),
            ],
        ))
    }

    /// Fails if `field_text_map` has a key that is neither required nor optional.
    pub fn validate_if_translations_contain_only_expected_fields(
        &self,
        field_text_map: &HashMap<String, String>,
        required_fields: &HashSet<String>,
        optional_fields: &HashSet<String>,
    ) -> Result<()> {
        let unexpected = field_text_map
            .keys()
            .any(|field| !required_fields.contains(field) && !optional_fields.contains(field));
        if !unexpected {
            return Ok(());
        }

        tracing::warn!("Campo de traducción no permitido");
        Err(DomainError::invalid_request(
            ENTITY,
            ErrorCode::InvalidTranslationField,
            [
                ("fieldTextMap", json!(field_text_map)),
                ("requiredFields", json!(sorted(required_fields))),
                ("optionalFields", json!(sorted(optional_fields))),
            ],
        ))
    }

    /// Fails if a field used in any locale of `locale_field_texts_map` is
    /// missing from the application-locale `field_text_map`.
    pub fn validate_if_field_is_not_defined_if_not_present_in_locale(
        &self,
        locale_field_texts_map: &HashMap<String, HashMap<String, String>>,
        field_text_map: &HashMap<String, String>,
    ) -> Result<()> {
        let undefined = locale_field_texts_map
            .values()
            .flat_map(HashMap::keys)
            .any(|field| !field_text_map.contains_key(field));
        if !undefined {
            return Ok(());
        }

        tracing::warn!("Campo definido en otro idioma pero ausente en el idioma de la aplicación");
        Err(DomainError::invalid_request(
            ENTITY,
            ErrorCode::OptionalFieldDefinedButNotPresentInApplicationLocale,
            [
                ("localeFieldTextsMap", json!(locale_field_texts_map)),
                ("fieldTextMap", json!(field_text_map)),
            ],
        ))
    }
}

// deterministic order in error details
fn sorted(fields: &HashSet<String>) -> Vec<&String> {
    let mut fields: Vec<&String> = fields.iter().collect();
    fields.sort();
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::ErrorKind;

    fn texts(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn fields(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_locale_presence() {
        let validation = TranslationValidationService::new();
        let map = texts(&[("en", "Hello"), ("da", "Hej")]);

        assert!(validation.validate_if_translations_in_locale_exist(Some(&map), "en").is_ok());

        let err = validation
            .validate_if_translations_in_locale_exist(Some(&map), "pl")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert_eq!(err.code, Some(ErrorCode::NoApplicationLocaleTranslation));
        assert_eq!(err.details["locale"], json!("pl"));

        let err = validation
            .validate_if_translations_in_locale_exist::<String>(None, "en")
            .unwrap_err();
        assert_eq!(err.code, Some(ErrorCode::NoApplicationLocaleTranslation));
        assert_eq!(err.details["localeMap"], serde_json::Value::Null);
    }

    #[test]
    fn test_required_fields_checks_keys_only() {
        let validation = TranslationValidationService::new();
        let required = fields(&["title"]);

        assert!(validation
            .validate_if_translations_have_required_fields(&texts(&[("title", "")]), &required)
            .is_ok());

        let err = validation
            .validate_if_translations_have_required_fields(&texts(&[("body", "B")]), &required)
            .unwrap_err();
        assert_eq!(err.code, Some(ErrorCode::NoRequiredFieldInApplicationLocale));
        assert_eq!(err.details["requiredFields"], json!(["title"]));
    }

    #[test]
    fn test_only_expected_fields() {
        let validation = TranslationValidationService::new();
        let required = fields(&["required"]);
        let optional = fields(&["optional"]);

        assert!(validation
            .validate_if_translations_contain_only_expected_fields(
                &texts(&[("required", "R"), ("optional", "O")]),
                &required,
                &optional,
            )
            .is_ok());

        let err = validation
            .validate_if_translations_contain_only_expected_fields(
                &texts(&[("required", "R"), ("spanishInquisition", "Nobody expects")]),
                &required,
                &optional,
            )
            .unwrap_err();
        assert_eq!(err.code, Some(ErrorCode::InvalidTranslationField));
    }

    #[test]
    fn test_field_defined_elsewhere_must_exist_in_application_locale() {
        let validation = TranslationValidationService::new();
        let application = texts(&[("required", "R"), ("optional", "O")]);

        let mut others = HashMap::new();
        others.insert("da".to_string(), texts(&[("required", "Rd")]));
        assert!(validation
            .validate_if_field_is_not_defined_if_not_present_in_locale(&others, &application)
            .is_ok());

        // defined only in the default locale is fine the other way round
        let only_required = texts(&[("required", "R")]);
        others.insert("pl".to_string(), texts(&[("optional", "Op")]));
        let err = validation
            .validate_if_field_is_not_defined_if_not_present_in_locale(&others, &only_required)
            .unwrap_err();
        assert_eq!(
            err.code,
            Some(ErrorCode::OptionalFieldDefinedButNotPresentInApplicationLocale)
        );
    }
}
