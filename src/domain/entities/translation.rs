use serde::{Deserialize, Serialize};

/// One text variant of a translation in one locale.
///
/// Rows sharing an `identifier` form one logical translation. `id` is the
/// storage surrogate key and is only assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    id: Option<i64>,
    identifier: Option<i32>,
    locale: String,
    text: String,
}

impl Translation {
    /// Nueva traducción cuyo identificador asignará el almacén
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: None,
            identifier: None,
            locale: locale.into(),
            text: text.into(),
        }
    }

    /// Nueva variante de una traducción existente
    pub fn with_identifier(identifier: i32, locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: None,
            identifier: Some(identifier),
            locale: locale.into(),
            text: text.into(),
        }
    }

    // Crear desde valores existentes (para reconstrucción desde BD)
    pub fn from_data(id: i64, identifier: i32, locale: String, text: String) -> Self {
        Self {
            id: Some(id),
            identifier: Some(identifier),
            locale,
            text,
        }
    }

    // Getters
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn identifier(&self) -> Option<i32> {
        self.identifier
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Replaces the text, returning `false` when it was already equal.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.text == text {
            return false;
        }
        self.text = text;
        true
    }

    /// Used by store adapters once the row has been written.
    pub fn persisted(self, id: i64, identifier: i32) -> Self {
        Self {
            id: Some(id),
            identifier: Some(identifier),
            ..self
        }
    }
}

/// Identifier with the text resolved for one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationText {
    pub identifier: i32,
    pub text: String,
}
