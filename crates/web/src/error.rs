use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use importer::ImporterError;
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Import(ImporterError),
    Validation(ValidationErrors),
    BadRequest(String),
    NotFound,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Import(e) => write!(f, "Import error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::NotFound => write!(f, "Resource not found"),
        }
    }
}

fn storage_status(error: &StorageError) -> StatusCode {
    match error {
        StorageError::NotFound => StatusCode::NOT_FOUND,
        StorageError::Forbidden => StatusCode::FORBIDDEN,
        StorageError::ConstraintViolation(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn storage_body(error: &StorageError) -> serde_json::Value {
    match error {
        StorageError::NotFound => json!({ "error": "Resource not found" }),
        StorageError::Forbidden => json!({ "error": "You do not have access to this resource" }),
        StorageError::ConstraintViolation(msg) => json!({ "error": msg }),
        e => {
            tracing::error!("Storage error: {:?}", e);
            json!({ "error": "An internal error occurred" })
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Storage(e) => storage_status(e),
            Self::Import(ImporterError::StorageError(e)) => storage_status(e),
            Self::Import(ImporterError::EmptyInput) => StatusCode::BAD_REQUEST,
            Self::Import(ImporterError::NotFound { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Import(ImporterError::UnknownKind(_)) => StatusCode::NOT_FOUND,
            Self::Import(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
        };

        let body = match &self {
            Self::Storage(e) => storage_body(e),
            Self::Import(ImporterError::StorageError(e)) => storage_body(e),
            Self::Import(
                e @ (ImporterError::EmptyInput
                | ImporterError::NotFound { .. }
                | ImporterError::UnknownKind(_)),
            ) => {
                json!({
                    "error": e.to_string()
                })
            }
            Self::Import(e) => {
                tracing::error!("Import error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::NotFound => {
                json!({
                    "error": "Resource not found"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ImporterError> for WebError {
    fn from(error: ImporterError) -> Self {
        Self::Import(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

pub type ApiResult<T> = Result<T, WebError>;
