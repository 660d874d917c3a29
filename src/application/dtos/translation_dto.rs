use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::errors::DomainError;

/// Body carrying a single text
#[derive(Debug, Deserialize)]
pub struct TranslationTextRequestDto {
    pub text: String,
}

/// Identifier of a created translation, absent when nothing was created
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TranslationIdentifierDto {
    pub identifier: Option<i32>,
}

/// DTO for per-field creation
#[derive(Debug, Deserialize)]
pub struct CreateMultilingualTranslationsDto {
    /// locale -> field -> text
    pub translations: HashMap<String, HashMap<String, String>>,

    #[serde(default)]
    pub required_fields: HashSet<String>,

    #[serde(default)]
    pub optional_fields: HashSet<String>,
}

/// DTO for per-field update
#[derive(Debug, Deserialize)]
pub struct UpdateMultilingualTranslationsDto {
    /// field -> identifier, `null` for fields not created yet
    pub fields: HashMap<String, Option<i32>>,

    /// locale -> field -> text
    #[serde(default)]
    pub translations: HashMap<String, HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct LocaleQueryDto {
    /// Defaults to the application locale
    pub locale: Option<String>,
}

/// Path of a translation in one locale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentifierAndLocaleDto {
    pub identifier: i32,
    pub locale: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TranslationResponseDto {
    pub identifier: i32,
    pub locale: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchTranslationRequestDto {
    pub identifiers: Vec<i32>,
    pub locale: Option<String>,
}

/// One entry of a batch read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationIdentifierAndTextDto {
    pub identifier: i32,
    pub text: String,
}

impl TranslationIdentifierAndTextDto {
    /// Converts a batch result into a list ordered by identifier
    pub fn from_map(texts: HashMap<i32, String>) -> Vec<Self> {
        let mut items: Vec<Self> = texts
            .into_iter()
            .map(|(identifier, text)| Self { identifier, text })
            .collect();
        items.sort_by_key(|item| item.identifier);
        items
    }
}

/// Error body returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub code: Option<String>,
    pub message: String,
    pub details: BTreeMap<String, Value>,
}

impl From<&DomainError> for ErrorResponseDto {
    fn from(err: &DomainError) -> Self {
        Self {
            code: err.code_str().map(str::to_string),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_batch_results_are_ordered() {
        let mut texts = HashMap::new();
        texts.insert(3, "C".to_string());
        texts.insert(1, "A".to_string());

        let items = TranslationIdentifierAndTextDto::from_map(texts);
        assert_eq!(items[0].identifier, 1);
        assert_eq!(items[1].text, "C");
    }

    #[test]
    fn test_error_body_carries_code() {
        let err = DomainError::invalid_request(
            "Translation",
            ErrorCode::ApplicationLocaleTranslationDeletion,
            [("identifier", json!(7))],
        );
        let body = ErrorResponseDto::from(&err);

        assert_eq!(body.code.as_deref(), Some("APPLICATION_LOCALE_TRANSLATION_DELETION"));
        assert_eq!(body.details["identifier"], json!(7));
    }

    #[test]
    fn test_fields_request_defaults() {
        let dto: CreateMultilingualTranslationsDto =
            serde_json::from_value(json!({ "translations": { "en": { "title": "T" } } })).unwrap();
        assert!(dto.required_fields.is_empty());
        assert!(dto.optional_fields.is_empty());
    }
}
