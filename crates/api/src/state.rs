use std::sync::Arc;

use hairgen_core::artifacts::ArtifactWriter;
use hairgen_inpaint::HairGenerator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is a small path).
#[derive(Clone)]
pub struct AppState {
    /// Hair generator wrapping the model loaded at startup.
    pub generator: Arc<HairGenerator>,
    /// Best-effort debug artifact writer.
    pub artifacts: ArtifactWriter,
}
