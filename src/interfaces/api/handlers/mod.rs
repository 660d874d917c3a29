pub mod translation_handler;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::dtos::translation_dto::ErrorResponseDto;
use crate::common::errors::{DomainError, ErrorKind};

/// Tipo de resultado para controladores de API
pub type ApiResult<T> = Result<T, DomainError>;

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Error procesando la petición: {}", self);
        }

        (status, Json(ErrorResponseDto::from(&self))).into_response()
    }
}
