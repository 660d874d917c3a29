use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::application::services::translation_service::TranslationService;
use crate::interfaces::api::handlers::translation_handler::TranslationHandler;

/// Creates API routes for the application
pub fn create_api_routes(translation_service: Arc<TranslationService>) -> Router {
    let translation_router = Router::new()
        .route("/", post(TranslationHandler::create_translation))
        .route("/multilingual", post(TranslationHandler::create_multilingual_translation))
        .route(
            "/multilingual/fields",
            post(TranslationHandler::create_multilingual_translations)
                .put(TranslationHandler::update_multilingual_translations),
        )
        .route("/batch", post(TranslationHandler::find_translations))
        .route(
            "/{identifier}",
            get(TranslationHandler::find_translation)
                .put(TranslationHandler::update_multilingual_translation)
                .delete(TranslationHandler::delete_translation),
        )
        .route(
            "/{identifier}/{locale}",
            put(TranslationHandler::update_translation)
                .post(TranslationHandler::append_translation)
                .delete(TranslationHandler::delete_translation_in_locale),
        )
        .with_state(translation_service);

    Router::new().nest("/api/translations", translation_router)
}
