//! Handler for `POST /generate`.
//!
//! Request flow: read the multipart fields, decode both images, persist the
//! inputs, generate the variants, persist the outputs, and respond with the
//! grid as PNG. Artifact writes are best-effort and never change the response.

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hairgen_core::artifacts::{ArtifactPaths, ArtifactWriter};
use hairgen_core::error::CoreError;
use hairgen_core::imaging;
use hairgen_inpaint::GenerationOutput;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying the photo.
pub const IMAGE_FIELD: &str = "image";

/// Multipart field carrying the white-on-black mask.
pub const MASK_FIELD: &str = "mask_image";

/// One file part of the upload.
#[derive(Debug)]
pub struct UploadedImage {
    /// Filename declared by the client. Informational only.
    pub filename: String,
    pub data: Bytes,
}

/// POST /generate
///
/// Accepts `image` and `mask_image` file parts and returns the
/// original-plus-variants grid as `image/png`.
pub async fn generate(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Response> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Request body is not multipart");
        AppError::MissingImages
    })?;
    let (image, mask) = read_uploads(multipart).await?;
    tracing::debug!(
        image_bytes = image.data.len(),
        image_name = %image.filename,
        mask_bytes = mask.data.len(),
        "Upload validated",
    );

    let run = state.artifacts.begin_run();

    let writer = state.artifacts.clone();
    let input_run = run.clone();
    let (image, mask) = tokio::task::spawn_blocking(move || -> Result<_, CoreError> {
        let image = imaging::decode_rgb(&image.data)?;
        let mask = imaging::decode_rgb(&mask.data)?;
        if let Err(err) = writer.write_inputs(&input_run, &image, &mask) {
            warn_artifacts(&input_run, &err);
        }
        Ok((image, mask))
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))??;

    tracing::info!(
        run = %run.stem(),
        width = image.width(),
        height = image.height(),
        "Images decoded",
    );

    let output = state.generator.generate(image, mask).await?;

    let writer = state.artifacts.clone();
    let grid_png = tokio::task::spawn_blocking(move || {
        persist_outputs(&writer, &run, &output);
        imaging::encode_png(output.grid())
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))??;

    Ok(([(CONTENT_TYPE, "image/png")], grid_png).into_response())
}

/// Collect the image and mask parts.
///
/// Only file parts count: a part without a filename, or with an empty one, is
/// treated as absent. A named file with no content is kept and fails at
/// decode. Unknown fields are ignored.
async fn read_uploads(mut multipart: Multipart) -> AppResult<(UploadedImage, UploadedImage)> {
    let mut image = None;
    let mut mask = None;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let slot = match field.name() {
            Some(IMAGE_FIELD) => &mut image,
            Some(MASK_FIELD) => &mut mask,
            _ => continue,
        };
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let data = field.bytes().await.map_err(upload_error)?;
        *slot = Some(UploadedImage { filename, data });
    }

    match (image, mask) {
        (Some(image), Some(mask)) => Ok((image, mask)),
        _ => Err(AppError::MissingImages),
    }
}

fn upload_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge(err.body_text())
    } else {
        AppError::Core(CoreError::Decode(err.body_text()))
    }
}

fn persist_outputs(writer: &ArtifactWriter, run: &ArtifactPaths, output: &GenerationOutput) {
    match writer.write_outputs(run, output.variants(), output.grid()) {
        Ok(()) => tracing::info!(
            run = %run.stem(),
            dir = %writer.dir().display(),
            "Artifacts written",
        ),
        Err(err) => warn_artifacts(run, &err),
    }
}

fn warn_artifacts(run: &ArtifactPaths, err: &CoreError) {
    tracing::warn!(run = %run.stem(), error = %err, "Artifact write failed, continuing");
}
