#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, Response};
use axum::Router;
use hairgen_api::config::ServerConfig;
use hairgen_api::router::build_app_router;
use hairgen_api::state::AppState;
use hairgen_core::artifacts::ArtifactWriter;
use hairgen_core::params::GenerationParameters;
use hairgen_inpaint::{HairGenerator, InpaintBackend, InpaintError, InpaintRequest};
use http_body_util::BodyExt;
use image::{ImageFormat, Rgb, RgbImage};
use tower::ServiceExt;

/// Boundary used by [`MultipartBody`].
pub const BOUNDARY: &str = "hairgen-test-boundary";

/// Build a test `ServerConfig` writing artifacts into `output_dir`.
pub fn test_config(output_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 20 * 1024 * 1024,
        output_dir: output_dir.to_path_buf(),
        inpaint_api_url: "http://127.0.0.1:1".to_string(),
        inpaint_model: "test/inpaint".to_string(),
        max_concurrent_generations: 1,
    }
}

/// Build the full application router around `backend`, using the same
/// middleware stack as production.
pub fn build_test_app(backend: Arc<dyn InpaintBackend>, config: ServerConfig) -> Router {
    let generator = HairGenerator::new(
        backend,
        GenerationParameters::hair_preview(),
        config.max_concurrent_generations,
    );
    let state = AppState {
        generator: Arc::new(generator),
        artifacts: ArtifactWriter::new(&config.output_dir),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// Deterministic stand-in for the model.
///
/// Variant `n` repaints every pixel whose mask value is bright with a colour
/// derived from the seed and `n`; everything else is copied from the input.
#[derive(Default)]
pub struct FakeBackend {
    calls: AtomicUsize,
}

impl FakeBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn variant_colour(seed: u64, n: usize) -> Rgb<u8> {
        let base = (seed % 256) as u8;
        let n = n as u8;
        Rgb([base.wrapping_add(60 * n), 90 + 40 * n, 200 - 50 * n])
    }
}

#[async_trait]
impl InpaintBackend for FakeBackend {
    fn model_id(&self) -> &str {
        "test/inpaint"
    }

    async fn inpaint(&self, request: InpaintRequest<'_>) -> Result<Vec<RgbImage>, InpaintError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let variants = (0..request.params.sample_count)
            .map(|n| {
                let colour = Self::variant_colour(request.params.seed, n);
                let mut out = request.image.clone();
                for (x, y, pixel) in out.enumerate_pixels_mut() {
                    if request.mask.get_pixel(x, y)[0] > 127 {
                        *pixel = colour;
                    }
                }
                out
            })
            .collect();
        Ok(variants)
    }
}

/// A backend whose every call fails like an out-of-memory device.
pub struct FailingBackend;

#[async_trait]
impl InpaintBackend for FailingBackend {
    fn model_id(&self) -> &str {
        "test/failing"
    }

    async fn inpaint(&self, _request: InpaintRequest<'_>) -> Result<Vec<RgbImage>, InpaintError> {
        Err(InpaintError::Api {
            status: 500,
            body: "CUDA out of memory".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Encode `image` in `format`.
pub fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// A solid-colour photo as PNG bytes.
pub fn photo_png(width: u32, height: u32) -> Vec<u8> {
    encode(
        &RgbImage::from_pixel(width, height, Rgb([180, 140, 120])),
        ImageFormat::Png,
    )
}

/// A black mask with a white top half as PNG bytes.
pub fn mask_png(width: u32, height: u32) -> Vec<u8> {
    let mask = RgbImage::from_fn(width, height, |_, y| {
        if y < height / 2 {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    });
    encode(&mask, ImageFormat::Png)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Builder for a `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                .as_bytes(),
        );
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.buf
    }
}

/// Multipart body carrying both uploads.
pub fn upload_body(image: &[u8], mask: &[u8]) -> Vec<u8> {
    MultipartBody::new()
        .file("image", "photo.png", "image/png", image)
        .file("mask_image", "mask.png", "image/png", mask)
        .finish()
}

/// Send a multipart POST to `/generate`.
pub async fn post_generate(app: Router, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri("/generate")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send an arbitrary request.
pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}
