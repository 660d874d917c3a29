use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde_json::Value;
use thiserror::Error;

/// Tipos de errores comunes en toda la aplicación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Entidad no encontrada
    NotFound,
    /// Entrada inválida o validación fallida
    InvalidInput,
    /// Tiempo de espera agotado
    Timeout,
    /// Error interno del sistema
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ErrorKind::NotFound => write!(f, "Not Found"),
            ErrorKind::InvalidInput => write!(f, "Invalid Input"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::InternalError => write!(f, "Internal Error"),
        }
    }
}

/// Stable machine-readable codes attached to rejected requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoApplicationLocaleTranslation,
    NoRequiredFieldInApplicationLocale,
    InvalidTranslationField,
    OptionalFieldDefinedButNotPresentInApplicationLocale,
    ApplicationLocaleTranslationDeletion,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoApplicationLocaleTranslation => "NO_APPLICATION_LOCALE_TRANSLATION",
            ErrorCode::NoRequiredFieldInApplicationLocale => "NO_REQUIRED_FIELD_IN_APPLICATION_LOCALE",
            ErrorCode::InvalidTranslationField => "INVALID_TRANSLATION_FIELD",
            ErrorCode::OptionalFieldDefinedButNotPresentInApplicationLocale => {
                "OPTIONAL_FIELD_DEFINED_BUT_NOT_PRESENT_IN_APPLICATION_LOCALE"
            }
            ErrorCode::ApplicationLocaleTranslationDeletion => "APPLICATION_LOCALE_TRANSLATION_DELETION",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Error base de dominio que proporciona contexto detallado
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct DomainError {
    /// Tipo de error
    pub kind: ErrorKind,
    /// Tipo de entidad afectada (ej: "Translation")
    pub entity_type: &'static str,
    /// Código estable para errores de validación
    pub code: Option<ErrorCode>,
    /// Valores que provocaron el error, para diagnóstico
    pub details: BTreeMap<String, Value>,
    /// Mensaje descriptivo del error
    pub message: String,
    /// Error fuente (opcional)
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl DomainError {
    /// Crea un nuevo error de dominio
    pub fn new<S: Into<String>>(kind: ErrorKind, entity_type: &'static str, message: S) -> Self {
        Self {
            kind,
            entity_type,
            code: None,
            details: BTreeMap::new(),
            message: message.into(),
            source: None,
        }
    }

    /// Crea un error de entidad no encontrada con las claves buscadas
    pub fn not_found<I, K>(entity_type: &'static str, keys: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let details: BTreeMap<String, Value> =
            keys.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let message = format!(
            "{} not found: {}",
            entity_type,
            serde_json::to_string(&details).unwrap_or_default()
        );
        Self {
            kind: ErrorKind::NotFound,
            entity_type,
            code: None,
            details,
            message,
            source: None,
        }
    }

    /// Crea un error de petición inválida con su código y los datos recibidos
    pub fn invalid_request<I, K>(entity_type: &'static str, code: ErrorCode, data: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            kind: ErrorKind::InvalidInput,
            entity_type,
            code: Some(code),
            details: data.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            message: format!("Invalid {} request data: {}", entity_type, code),
            source: None,
        }
    }

    /// Crea un error de tiempo agotado
    pub fn timeout<S: Into<String>>(entity_type: &'static str, message: S) -> Self {
        Self::new(ErrorKind::Timeout, entity_type, message)
    }

    /// Crea un error interno
    pub fn internal_error<S: Into<String>>(entity_type: &'static str, message: S) -> Self {
        Self::new(ErrorKind::InternalError, entity_type, message)
    }

    /// Crea un error de validación sin código
    pub fn validation_error<S: Into<String>>(entity_type: &'static str, message: S) -> Self {
        Self::new(ErrorKind::InvalidInput, entity_type, message)
    }

    /// Establece el error fuente
    pub fn with_source<E: StdError + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code_str(&self) -> Option<&'static str> {
        self.code.as_ref().map(ErrorCode::as_str)
    }
}

/// Alias de resultado para la capa de aplicación
pub type Result<T> = std::result::Result<T, DomainError>;
