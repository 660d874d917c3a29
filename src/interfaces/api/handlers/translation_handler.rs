use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::application::dtos::translation_dto::{
    BatchTranslationRequestDto, CreateMultilingualTranslationsDto, IdentifierAndLocaleDto, LocaleQueryDto,
    TranslationIdentifierAndTextDto, TranslationIdentifierDto, TranslationResponseDto, TranslationTextRequestDto,
    UpdateMultilingualTranslationsDto,
};
use crate::application::services::translation_service::TranslationService;
use crate::common::errors::DomainError;
use crate::domain::services::locale_service::is_locale;
use crate::interfaces::api::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::interfaces::api::handlers::ApiResult;

type AppState = Arc<TranslationService>;

/// Handler for translation API endpoints
pub struct TranslationHandler;

impl TranslationHandler {
    /// Creates a translation in the application locale
    pub async fn create_translation(
        State(service): State<AppState>,
        ApiJson(dto): ApiJson<TranslationTextRequestDto>,
    ) -> ApiResult<impl IntoResponse> {
        let identifier = service.create_translation(&dto.text).await?;
        Ok((
            StatusCode::CREATED,
            Json(TranslationIdentifierDto {
                identifier: Some(identifier),
            }),
        ))
    }

    /// Creates a translation from a `{locale: text}` map
    pub async fn create_multilingual_translation(
        State(service): State<AppState>,
        ApiJson(locale_text_map): ApiJson<HashMap<String, String>>,
    ) -> ApiResult<impl IntoResponse> {
        check_locale_keys(&locale_text_map)?;

        let identifier = service.create_multilingual_translation(&locale_text_map).await?;
        let status = if identifier.is_some() { StatusCode::CREATED } else { StatusCode::OK };
        Ok((status, Json(TranslationIdentifierDto { identifier })))
    }

    /// Creates one translation per field, returning `{field: identifier}`
    pub async fn create_multilingual_translations(
        State(service): State<AppState>,
        ApiJson(dto): ApiJson<CreateMultilingualTranslationsDto>,
    ) -> ApiResult<impl IntoResponse> {
        check_locale_keys(&dto.translations)?;

        let identifiers = service
            .create_multilingual_translations(&dto.translations, &dto.required_fields, &dto.optional_fields)
            .await?;
        Ok((StatusCode::CREATED, Json(identifiers)))
    }

    /// Reads a translation with fallback to the application locale
    pub async fn find_translation(
        State(service): State<AppState>,
        ApiPath(identifier): ApiPath<i32>,
        ApiQuery(query): ApiQuery<LocaleQueryDto>,
    ) -> ApiResult<impl IntoResponse> {
        let locale = resolve_locale(&service, query.locale)?;
        let text = service.find_text_by_identifier_and_locale(identifier, &locale).await?;

        Ok(Json(TranslationResponseDto {
            identifier,
            locale,
            text,
        }))
    }

    /// Reads several translations in one locale
    pub async fn find_translations(
        State(service): State<AppState>,
        ApiJson(dto): ApiJson<BatchTranslationRequestDto>,
    ) -> ApiResult<impl IntoResponse> {
        let locale = resolve_locale(&service, dto.locale)?;
        let texts = service
            .find_all_identifier_and_text_by_identifiers_and_locale(dto.identifiers, &locale)
            .await?;

        Ok(Json(TranslationIdentifierAndTextDto::from_map(texts)))
    }

    /// Replaces the text of a translation in one locale
    pub async fn update_translation(
        State(service): State<AppState>,
        ApiPath(path): ApiPath<IdentifierAndLocaleDto>,
        ApiJson(dto): ApiJson<TranslationTextRequestDto>,
    ) -> ApiResult<impl IntoResponse> {
        check_locale(&path.locale)?;

        service.update_translation(path.identifier, &path.locale, &dto.text).await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// Adds a locale to an existing translation
    pub async fn append_translation(
        State(service): State<AppState>,
        ApiPath(path): ApiPath<IdentifierAndLocaleDto>,
        ApiJson(dto): ApiJson<TranslationTextRequestDto>,
    ) -> ApiResult<impl IntoResponse> {
        check_locale(&path.locale)?;

        service.append_translation(path.identifier, &path.locale, &dto.text).await?;
        Ok(StatusCode::CREATED)
    }

    /// Replaces every locale of a translation with the given `{locale: text}` map
    pub async fn update_multilingual_translation(
        State(service): State<AppState>,
        ApiPath(identifier): ApiPath<i32>,
        ApiJson(locale_text_map): ApiJson<HashMap<String, String>>,
    ) -> ApiResult<impl IntoResponse> {
        check_locale_keys(&locale_text_map)?;

        service
            .update_multilingual_translation(identifier, &locale_text_map)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// Updates one translation per field, returning the updated field map
    pub async fn update_multilingual_translations(
        State(service): State<AppState>,
        ApiJson(dto): ApiJson<UpdateMultilingualTranslationsDto>,
    ) -> ApiResult<impl IntoResponse> {
        check_locale_keys(&dto.translations)?;

        let fields = service
            .update_multilingual_translations(&dto.fields, &dto.translations)
            .await?;
        Ok(Json(fields))
    }

    /// Deletes a translation in every locale
    pub async fn delete_translation(
        State(service): State<AppState>,
        ApiPath(identifier): ApiPath<i32>,
    ) -> ApiResult<impl IntoResponse> {
        service.delete_all_translation_by(identifier).await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// Deletes a translation in one locale
    pub async fn delete_translation_in_locale(
        State(service): State<AppState>,
        ApiPath(path): ApiPath<IdentifierAndLocaleDto>,
    ) -> ApiResult<impl IntoResponse> {
        check_locale(&path.locale)?;

        service
            .delete_translation_by_identifier_and_locale(path.identifier, &path.locale)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }
}

fn resolve_locale(service: &TranslationService, locale: Option<String>) -> ApiResult<String> {
    match locale {
        Some(locale) => {
            check_locale(&locale)?;
            Ok(locale)
        }
        None => Ok(service.application_locale().to_string()),
    }
}

fn check_locale(locale: &str) -> ApiResult<()> {
    if is_locale(locale) {
        return Ok(());
    }

    tracing::warn!("Idioma no válido: {}", locale);
    let mut err = DomainError::validation_error("Locale", format!("Invalid locale: {}", locale));
    err.details.insert("locale".to_string(), json!(locale));
    Err(err)
}

fn check_locale_keys<V>(locale_map: &HashMap<String, V>) -> ApiResult<()> {
    locale_map.keys().try_for_each(|locale| check_locale(locale))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::repositories::translation_memory_repository::TranslationMemoryRepository;
    use crate::interfaces::api::routes::create_api_routes;

    fn app() -> Router {
        let repository = Arc::new(TranslationMemoryRepository::new());
        create_api_routes(Arc::new(TranslationService::new("en", repository)))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_create_and_read_with_fallback() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/translations/multilingual",
            Some(json!({ "en": "Hello", "da": "Hej" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let identifier = body["identifier"].as_i64().unwrap();

        let (status, body) = send(&app, Method::GET, &format!("/api/translations/{}?locale=da", identifier), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Hej");

        let (_, body) = send(&app, Method::GET, &format!("/api/translations/{}?locale=pl", identifier), None).await;
        assert_eq!(body["text"], "Hello");

        let (_, body) = send(&app, Method::GET, &format!("/api/translations/{}", identifier), None).await;
        assert_eq!(body["locale"], "en");
    }

    #[tokio::test]
    async fn test_invalid_locale_is_rejected_at_the_boundary() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/translations/multilingual",
            Some(json!({ "en": "Hello", "DA": "Hej" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["locale"], "DA");

        let (status, _) = send(&app, Method::GET, "/api/translations/1?locale=english", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_error_body_and_status() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/translations/multilingual",
            Some(json!({ "da": "Hej" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "NO_APPLICATION_LOCALE_TRANSLATION");

        let (status, body) = send(&app, Method::GET, "/api/translations/404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["details"]["identifier"], 404);

        let (status, body) = send(&app, Method::DELETE, "/api/translations/1/en", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "APPLICATION_LOCALE_TRANSLATION_DELETION");
    }

    #[tokio::test]
    async fn test_extractor_rejections_use_the_error_body() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/api/translations/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
        assert!(body["details"]["reason"].is_string());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/translations/multilingual")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"en":"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
        assert!(body["details"]["reason"].is_string());
    }

    #[tokio::test]
    async fn test_single_locale_lifecycle() {
        let app = app();

        let (status, body) = send(&app, Method::POST, "/api/translations", Some(json!({ "text": "Chair" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let identifier = body["identifier"].as_i64().unwrap();
        let uri = format!("/api/translations/{}/da", identifier);

        let (status, _) = send(&app, Method::POST, &uri, Some(json!({ "text": "Stol" }))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "text": "Stolen" }))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/translations/batch",
            Some(json!({ "identifiers": [identifier, 999], "locale": "da" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{ "identifier": identifier, "text": "Stolen" }]));

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/translations/{}", identifier), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &format!("/api/translations/{}", identifier), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fields_lifecycle() {
        let app = app();

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/translations/multilingual/fields",
            Some(json!({
                "translations": { "en": { "title": "Title" }, "da": { "title": "Titel" } },
                "required_fields": ["title"],
                "optional_fields": ["description"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let title = created["title"].as_i64().unwrap();

        let (status, updated) = send(
            &app,
            Method::PUT,
            "/api/translations/multilingual/fields",
            Some(json!({
                "fields": { "title": title, "description": null },
                "translations": { "en": { "title": "Title", "description": "About" } }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], title);
        assert!(updated["description"].is_i64());

        let (_, body) = send(&app, Method::GET, &format!("/api/translations/{}?locale=da", title), None).await;
        assert_eq!(body["text"], "Title");
    }
}
