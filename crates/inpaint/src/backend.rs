//! The inpainting backend interface and its error type.
//!
//! The backend is an opaque function: prepared image + mask + sampling
//! parameters in, a list of generated images out. [`crate::RemoteInpaintClient`]
//! is the production implementation.

use async_trait::async_trait;
use hairgen_core::params::GenerationParameters;
use image::RgbImage;

/// Inputs for a single backend invocation.
///
/// `image` and `mask` are already resized to `params.resolution`.
#[derive(Debug, Clone, Copy)]
pub struct InpaintRequest<'a> {
    pub image: &'a RgbImage,
    /// White marks the region to regenerate, black is preserved.
    pub mask: &'a RgbImage,
    pub params: &'a GenerationParameters,
}

/// Errors from invoking the inpainting model.
#[derive(Debug, thiserror::Error)]
pub enum InpaintError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The inference server returned a non-2xx status code.
    #[error("Inference API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body could not be interpreted.
    #[error("Invalid inference response: {0}")]
    InvalidResponse(String),

    /// The model produced a different number or size of images than requested.
    #[error("Unexpected model output: {0}")]
    UnexpectedOutput(String),

    /// Preparing images for the backend failed.
    #[error("Image processing failed: {0}")]
    Image(String),

    /// A blocking image task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(String),

    /// The generator has been shut down and accepts no more work.
    #[error("Inpainting backend unavailable")]
    Unavailable,
}

impl From<tokio::task::JoinError> for InpaintError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// A model that fills the masked region of an image.
///
/// Implementations are created once at startup and shared across requests,
/// so they must be safe to call concurrently. Any serialization a device
/// needs is applied by [`crate::HairGenerator`], not by the backend.
#[async_trait]
pub trait InpaintBackend: Send + Sync {
    /// Identifier of the loaded checkpoint.
    fn model_id(&self) -> &str;

    /// Run the model once, returning `params.sample_count` images.
    async fn inpaint(&self, request: InpaintRequest<'_>) -> Result<Vec<RgbImage>, InpaintError>;
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
