pub mod generate;

use axum::Router;

use crate::state::AppState;

/// Build the route tree.
///
/// ```text
/// POST /generate          multipart image + mask -> PNG preview grid
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(generate::router())
}
