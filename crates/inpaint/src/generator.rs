//! Hair variant generation on top of an [`InpaintBackend`].
//!
//! [`HairGenerator`] owns the shared backend handle and the fixed sampling
//! parameters. Per call it resizes the inputs to the model resolution,
//! invokes the backend exactly once, checks what came back, and lays the
//! original and the variants out on a single-row preview grid.

use std::sync::Arc;
use std::time::Instant;

use hairgen_core::grid::compose_grid;
use hairgen_core::imaging::prepare_for_model;
use hairgen_core::params::GenerationParameters;
use image::RgbImage;
use tokio::sync::Semaphore;

use crate::backend::{InpaintBackend, InpaintError, InpaintRequest};

/// Result of one generation run.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// Prepared original first, then each variant in backend order. Never
    /// empty; only [`HairGenerator::generate`] builds this.
    images: Vec<RgbImage>,
    /// `1 x images.len()` contact sheet of `images`.
    grid: RgbImage,
}

impl GenerationOutput {
    /// Original followed by the variants, in grid order.
    pub fn images(&self) -> &[RgbImage] {
        &self.images
    }

    /// The composed contact sheet.
    pub fn grid(&self) -> &RgbImage {
        &self.grid
    }

    /// The resized original as sent to the backend.
    pub fn original(&self) -> &RgbImage {
        &self.images[0]
    }

    /// The generated variants, without the original.
    pub fn variants(&self) -> &[RgbImage] {
        &self.images[1..]
    }
}

/// Shared, read-only generation service.
///
/// Created once at startup and cloned into request handlers behind an `Arc`.
/// A semaphore bounds how many backend calls run at once; a single GPU
/// typically needs this set to 1.
pub struct HairGenerator {
    backend: Arc<dyn InpaintBackend>,
    params: GenerationParameters,
    permits: Semaphore,
}

impl HairGenerator {
    pub fn new(
        backend: Arc<dyn InpaintBackend>,
        params: GenerationParameters,
        max_concurrent: usize,
    ) -> Self {
        Self {
            backend,
            params,
            permits: Semaphore::new(max_concurrent.max(1)),
        }
    }

    pub fn model_id(&self) -> &str {
        self.backend.model_id()
    }

    /// Stop accepting work. Calls waiting for or arriving after shutdown fail
    /// with [`InpaintError::Unavailable`]; calls already running finish.
    pub fn close(&self) {
        self.permits.close();
    }

    /// Generate hair variants for `image` within the white region of `mask`.
    ///
    /// Both inputs may be any size; they are resized to the model resolution
    /// first. No retry is attempted on failure.
    pub async fn generate(
        &self,
        image: RgbImage,
        mask: RgbImage,
    ) -> Result<GenerationOutput, InpaintError> {
        let resolution = self.params.resolution;
        let (image, mask) = tokio::task::spawn_blocking(move || {
            (
                prepare_for_model(&image, resolution),
                prepare_for_model(&mask, resolution),
            )
        })
        .await?;

        let variants = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| InpaintError::Unavailable)?;

            tracing::info!(
                model = %self.model_id(),
                samples = self.params.sample_count,
                seed = self.params.seed,
                "Invoking inpainting model",
            );
            let started = Instant::now();

            let variants = self
                .backend
                .inpaint(InpaintRequest {
                    image: &image,
                    mask: &mask,
                    params: &self.params,
                })
                .await?;

            tracing::info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                returned = variants.len(),
                "Inpainting model finished",
            );
            variants
        };

        check_variants(&variants, &self.params)?;

        let cols = self.params.grid_columns();
        let mut images = Vec::with_capacity(cols);
        images.push(image);
        images.extend(variants);

        let output = tokio::task::spawn_blocking(move || {
            let grid = compose_grid(&images, 1, cols);
            GenerationOutput { images, grid }
        })
        .await?;
        Ok(output)
    }
}

/// Reject backend output that would break the grid layout.
fn check_variants(variants: &[RgbImage], params: &GenerationParameters) -> Result<(), InpaintError> {
    if variants.len() != params.sample_count {
        return Err(InpaintError::UnexpectedOutput(format!(
            "expected {} images, model returned {}",
            params.sample_count,
            variants.len()
        )));
    }

    let expected = (params.resolution.width, params.resolution.height);
    if let Some((idx, bad)) = variants
        .iter()
        .enumerate()
        .find(|(_, v)| v.dimensions() != expected)
    {
        let (w, h) = bad.dimensions();
        return Err(InpaintError::UnexpectedOutput(format!(
            "image {} is {w}x{h}, expected {}x{}",
            idx + 1,
            expected.0,
            expected.1
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
