use std::sync::Arc;

use hairgen_api::config::ServerConfig;
use hairgen_api::router::build_app_router;
use hairgen_api::state::AppState;
use hairgen_core::artifacts::ArtifactWriter;
use hairgen_core::params::GenerationParameters;
use hairgen_inpaint::{HairGenerator, RemoteInpaintClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hairgen_api=debug,hairgen_inpaint=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid server configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(
        host = %config.host,
        port = config.port,
        output_dir = %config.output_dir.display(),
        "Loaded server configuration",
    );

    // --- Model ---
    // Loaded once; the service does not accept requests without it.
    let client = match RemoteInpaintClient::connect(
        config.inpaint_api_url.clone(),
        config.inpaint_model.clone(),
    )
    .await
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(
                error = %e,
                api_url = %config.inpaint_api_url,
                model = %config.inpaint_model,
                "Failed to load inpainting model",
            );
            std::process::exit(1);
        }
    };

    let generator = Arc::new(HairGenerator::new(
        Arc::new(client),
        GenerationParameters::hair_preview(),
        config.max_concurrent_generations,
    ));

    // --- App state ---
    let state = AppState {
        generator: Arc::clone(&generator),
        artifacts: ArtifactWriter::new(&config.output_dir),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind to address");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "Starting server");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    // --- Post-shutdown cleanup ---
    // Requests still waiting for the model fail fast instead of queueing.
    generator.close();
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
