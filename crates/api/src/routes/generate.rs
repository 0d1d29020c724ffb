//! Route definition for hair preview generation.
//!
//! ```text
//! POST /generate          generate
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::generate;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(generate::generate))
}
