use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderValue;
use hairgen_core::artifacts::DEFAULT_OUTPUT_DIR;
use hairgen_inpaint::DEFAULT_MODEL_ID;

/// Wildcard entry in `CORS_ORIGINS` allowing any origin.
pub const ANY_ORIGIN: &str = "*";

/// A configuration value that could not be used.
#[derive(Debug, thiserror::Error)]
#[error("Invalid value for {var} ('{value}'): {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development next to an
/// inference server on the same host.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `600`). Generation is slow.
    pub request_timeout_secs: u64,
    /// Maximum multipart request body size in bytes (default: 20 MiB).
    pub max_upload_bytes: usize,
    /// Directory receiving debug artifacts (default: `generated_images`).
    pub output_dir: PathBuf,
    /// Base URL of the inference server.
    pub inpaint_api_url: String,
    /// Checkpoint loaded at startup.
    pub inpaint_model: String,
    /// Upper bound on simultaneous model invocations (default: `1`).
    pub max_concurrent_generations: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                                |
    /// |------------------------------|----------------------------------------|
    /// | `HOST`                       | `0.0.0.0`                              |
    /// | `PORT`                       | `5000`                                 |
    /// | `CORS_ORIGINS`               | `http://localhost:3000`                |
    /// | `REQUEST_TIMEOUT_SECS`       | `600`                                  |
    /// | `MAX_UPLOAD_BYTES`           | `20971520`                             |
    /// | `OUTPUT_DIR`                 | `generated_images`                     |
    /// | `INPAINT_API_URL`            | `http://127.0.0.1:7860`                |
    /// | `INPAINT_MODEL`              | `runwayml/stable-diffusion-inpainting` |
    /// | `MAX_CONCURRENT_GENERATIONS` | `1`                                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.into());

        let host: IpAddr = parse_var("HOST", var("HOST", "0.0.0.0"))?;
        let port: u16 = parse_var("PORT", var("PORT", "5000"))?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in cors_origins.iter().filter(|o| o.as_str() != ANY_ORIGIN) {
            HeaderValue::from_str(origin).map_err(|e| ConfigError {
                var: "CORS_ORIGINS",
                value: origin.clone(),
                reason: e.to_string(),
            })?;
        }

        let request_timeout_secs: u64 =
            parse_var("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS", "600"))?;
        let max_upload_bytes: usize =
            parse_var("MAX_UPLOAD_BYTES", var("MAX_UPLOAD_BYTES", "20971520"))?;
        let output_dir = PathBuf::from(var("OUTPUT_DIR", DEFAULT_OUTPUT_DIR));
        let inpaint_api_url = var("INPAINT_API_URL", "http://127.0.0.1:7860");
        let inpaint_model = var("INPAINT_MODEL", DEFAULT_MODEL_ID);

        let max_concurrent_generations: usize = parse_var(
            "MAX_CONCURRENT_GENERATIONS",
            var("MAX_CONCURRENT_GENERATIONS", "1"),
        )?;
        if max_concurrent_generations == 0 {
            return Err(ConfigError {
                var: "MAX_CONCURRENT_GENERATIONS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            output_dir,
            inpaint_api_url,
            inpaint_model,
            max_concurrent_generations,
        })
    }

    /// Address the HTTP listener binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(name: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError {
        var: name,
        value: raw.clone(),
        reason: e.to_string(),
    })
}
