use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hairgen_core::error::CoreError;
use hairgen_inpaint::InpaintError;
use serde_json::json;

/// Message returned when either upload field is absent.
pub const MISSING_IMAGES_MESSAGE: &str = "Missing image or mask image";

/// Application-level error type for HTTP handlers.
///
/// Each pipeline stage reports a distinct variant, so the status code is
/// chosen from the variant alone. Implements [`IntoResponse`] to produce
/// consistent JSON error responses of the form `{"error": ..., "code": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The `image` or `mask_image` multipart field is missing or empty.
    #[error("Missing image or mask image")]
    MissingImages,

    /// A domain-level error from `hairgen_core` (decode failures included).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The inpainting model failed or returned unusable output.
    #[error(transparent)]
    Generation(#[from] InpaintError),

    /// The request body exceeded the configured upload limit.
    #[error("Upload too large: {0}")]
    UploadTooLarge(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::MissingImages => (
                StatusCode::BAD_REQUEST,
                "MISSING_INPUT",
                MISSING_IMAGES_MESSAGE.to_string(),
            ),

            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Decode(detail) => (
                    StatusCode::BAD_REQUEST,
                    "DECODE_ERROR",
                    format!("Error processing images: {detail}"),
                ),
                CoreError::Io(_) | CoreError::Internal(_) => {
                    tracing::error!(error = %core, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Model invocation ---
            AppError::Generation(err) => {
                tracing::error!(error = %err, "Hair generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_ERROR",
                    format!("Error generating hair images: {err}"),
                )
            }

            // --- HTTP-specific errors ---
            AppError::UploadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
