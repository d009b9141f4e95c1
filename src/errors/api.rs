use poem_openapi::{payload::Json, ApiResponse, Object};

use crate::errors::internal::{InternalError, ItemError};
use crate::services::image::ImageError;

/// Standardized error response body for item endpoints
#[derive(Object, Debug)]
pub struct ItemsErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

impl ItemsErrorResponse {
    fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }
    }
}

/// Error responses for the public items API
#[derive(ApiResponse, Debug)]
pub enum ItemsError {
    /// A required field is missing or malformed
    #[oai(status = 400)]
    ValidationFailed(Json<ItemsErrorResponse>),

    /// No item with the requested id
    #[oai(status = 404)]
    NotFound(Json<ItemsErrorResponse>),

    /// The requested status change is not a legal transition
    #[oai(status = 409)]
    IllegalTransition(Json<ItemsErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ItemsErrorResponse>),
}

impl ItemsError {
    pub fn validation(message: impl Into<String>) -> Self {
        ItemsError::ValidationFailed(Json(ItemsErrorResponse::new(
            "validation_failed",
            message,
            400,
        )))
    }

    pub fn not_found(id: &str) -> Self {
        ItemsError::NotFound(Json(ItemsErrorResponse::new(
            "item_not_found",
            format!("No item with id {id}"),
            404,
        )))
    }

    pub fn illegal_transition(message: impl Into<String>) -> Self {
        ItemsError::IllegalTransition(Json(ItemsErrorResponse::new(
            "illegal_transition",
            message,
            409,
        )))
    }

    pub fn internal() -> Self {
        ItemsError::Internal(Json(ItemsErrorResponse::new(
            "internal_error",
            "Internal server error",
            500,
        )))
    }
}

impl From<InternalError> for ItemsError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::Item(ItemError::NotFound(id)) => ItemsError::not_found(&id),
            other => {
                tracing::error!(error = %other, "items request failed");
                ItemsError::internal()
            }
        }
    }
}

/// Error responses for the admin items API
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// A required field is missing or malformed
    #[oai(status = 400)]
    ValidationFailed(Json<ItemsErrorResponse>),

    /// Admin token is missing or wrong
    #[oai(status = 401)]
    Unauthorized(Json<ItemsErrorResponse>),

    /// No item with the requested id
    #[oai(status = 404)]
    NotFound(Json<ItemsErrorResponse>),

    /// The requested status change is not a legal transition
    #[oai(status = 409)]
    IllegalTransition(Json<ItemsErrorResponse>),

    /// The uploaded image could not be decoded
    #[oai(status = 422)]
    UnsupportedImage(Json<ItemsErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ItemsErrorResponse>),
}

impl AdminError {
    pub fn validation(message: impl Into<String>) -> Self {
        AdminError::ValidationFailed(Json(ItemsErrorResponse::new(
            "validation_failed",
            message,
            400,
        )))
    }

    pub fn unauthorized() -> Self {
        AdminError::Unauthorized(Json(ItemsErrorResponse::new(
            "unauthorized",
            "Invalid or missing admin token",
            401,
        )))
    }

    pub fn not_found(id: &str) -> Self {
        AdminError::NotFound(Json(ItemsErrorResponse::new(
            "item_not_found",
            format!("No item with id {id}"),
            404,
        )))
    }

    pub fn illegal_transition(message: impl Into<String>) -> Self {
        AdminError::IllegalTransition(Json(ItemsErrorResponse::new(
            "illegal_transition",
            message,
            409,
        )))
    }

    pub fn unsupported_image(message: impl Into<String>) -> Self {
        AdminError::UnsupportedImage(Json(ItemsErrorResponse::new(
            "unsupported_image",
            message,
            422,
        )))
    }

    pub fn internal() -> Self {
        AdminError::Internal(Json(ItemsErrorResponse::new(
            "internal_error",
            "Internal server error",
            500,
        )))
    }
}

impl From<InternalError> for AdminError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::Item(ItemError::NotFound(id)) => AdminError::not_found(&id),
            other => {
                tracing::error!(error = %other, "admin request failed");
                AdminError::internal()
            }
        }
    }
}

impl From<ImageError> for AdminError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::Decode(e) => {
                AdminError::unsupported_image(format!("Could not decode image: {e}"))
            }
            ImageError::Encode(e) => {
                tracing::error!(error = %e, "image re-encoding failed");
                AdminError::internal()
            }
        }
    }
}
