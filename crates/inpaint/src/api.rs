//! REST client for a remote inpainting inference server.
//!
//! The server hosts the pretrained diffusion checkpoint. Two endpoints are
//! used:
//!
//! - `POST /models/load` loads the checkpoint onto the device. Called once at
//!   startup by [`RemoteInpaintClient::connect`].
//! - `POST /inpaint` runs the pipeline. Images travel as base64-encoded PNG in
//!   both directions.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hairgen_core::imaging;
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::backend::{InpaintBackend, InpaintError, InpaintRequest};

/// HTTP client for a single inference server.
#[derive(Debug)]
pub struct RemoteInpaintClient {
    client: reqwest::Client,
    api_url: String,
    model_id: String,
}

/// Response returned by `/models/load` once the checkpoint is resident.
#[derive(Debug, Deserialize)]
pub struct LoadModelResponse {
    /// Identifier of the loaded checkpoint.
    pub model: String,
    /// Execution device reported by the server, e.g. `cuda` or `cpu`.
    #[serde(default)]
    pub device: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoadModelBody<'a> {
    model: &'a str,
}

#[derive(Debug, Serialize)]
struct InpaintBody<'a> {
    model: &'a str,
    prompt: &'a str,
    image: String,
    mask_image: String,
    guidance_scale: f32,
    num_images_per_prompt: usize,
    seed: u64,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct InpaintResponseBody {
    images: Vec<String>,
}

impl RemoteInpaintClient {
    /// Create a client without contacting the server.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:7860`.
    /// * `model_id` - Checkpoint requested on every call.
    pub fn new(api_url: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, model_id)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            api_url,
            model_id: model_id.into(),
        }
    }

    /// Create a client and load the checkpoint on the server.
    ///
    /// Fails if the server is unreachable, rejects the load, or reports a
    /// different model than requested. Intended to run once at startup.
    pub async fn connect(
        api_url: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Result<Self, InpaintError> {
        let client = Self::new(api_url, model_id);
        let loaded = client.load_model().await?;

        if loaded.model != client.model_id {
            return Err(InpaintError::UnexpectedOutput(format!(
                "requested model '{}' but server loaded '{}'",
                client.model_id, loaded.model
            )));
        }

        tracing::info!(
            api_url = %client.api_url,
            model = %loaded.model,
            device = loaded.device.as_deref().unwrap_or("unknown"),
            "Inpainting model loaded",
        );
        Ok(client)
    }

    /// Base URL this client talks to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Ask the server to load the configured checkpoint.
    pub async fn load_model(&self) -> Result<LoadModelResponse, InpaintError> {
        let response = self
            .client
            .post(format!("{}/models/load", self.api_url))
            .json(&LoadModelBody {
                model: &self.model_id,
            })
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`InpaintError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, InpaintError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(InpaintError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, InpaintError> {
        let response = Self::ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| InpaintError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl InpaintBackend for RemoteInpaintClient {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn inpaint(&self, request: InpaintRequest<'_>) -> Result<Vec<RgbImage>, InpaintError> {
        let params = request.params;
        let body = InpaintBody {
            model: &self.model_id,
            prompt: &params.prompt,
            image: encode_image(request.image)?,
            mask_image: encode_image(request.mask)?,
            guidance_scale: params.guidance_scale,
            num_images_per_prompt: params.sample_count,
            seed: params.seed,
            width: params.resolution.width,
            height: params.resolution.height,
        };

        let response = self
            .client
            .post(format!("{}/inpaint", self.api_url))
            .json(&body)
            .send()
            .await?;

        let parsed: InpaintResponseBody = Self::parse_response(response).await?;
        parsed
            .images
            .iter()
            .enumerate()
            .map(|(idx, encoded)| decode_image(encoded, idx))
            .collect()
    }
}

fn encode_image(image: &RgbImage) -> Result<String, InpaintError> {
    let png = imaging::encode_png(image).map_err(|e| InpaintError::Image(e.to_string()))?;
    Ok(STANDARD.encode(png))
}

fn decode_image(encoded: &str, idx: usize) -> Result<RgbImage, InpaintError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| InpaintError::InvalidResponse(format!("image {idx} is not base64: {e}")))?;
    imaging::decode_rgb(&bytes)
        .map_err(|e| InpaintError::InvalidResponse(format!("image {idx}: {e}")))
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
