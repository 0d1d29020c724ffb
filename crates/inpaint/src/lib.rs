//! Inpainting backend integration.
//!
//! Provides the [`backend::InpaintBackend`] seam, an HTTP client for a remote
//! inference server hosting the pretrained inpainting checkpoint, and the
//! [`generator::HairGenerator`] that turns an uploaded image and mask into a
//! set of hair variants plus a preview grid.

pub mod api;
pub mod backend;
pub mod generator;

pub use api::RemoteInpaintClient;
pub use backend::{InpaintBackend, InpaintError, InpaintRequest};
pub use generator::{GenerationOutput, HairGenerator};

/// Checkpoint loaded when no model is configured.
pub const DEFAULT_MODEL_ID: &str = "runwayml/stable-diffusion-inpainting";
