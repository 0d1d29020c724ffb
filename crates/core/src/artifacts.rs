//! Debug artifact persistence.
//!
//! Every request writes its decoded inputs, each generated variant and the
//! composed grid as PNG files under a single output directory. Files are
//! written once and never read back by the service; there is no retention
//! policy, so the directory grows until an operator clears it.
//!
//! Writes are best-effort. Callers log failures and carry on.

use std::path::{Path, PathBuf};

use image::{ImageError, ImageFormat, RgbImage};
use uuid::Uuid;

use crate::error::CoreError;

/// Default output directory, relative to the process working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "generated_images";

/// Number of UUID hex characters appended to the timestamp in a run stem.
const RUN_ID_LEN: usize = 8;

/// File paths for a single generation run.
///
/// All names share a run stem `<unixts>-<id>`, so concurrent requests that
/// land in the same second never overwrite each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    dir: PathBuf,
    stem: String,
}

impl ArtifactPaths {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn original(&self) -> PathBuf {
        self.dir.join(format!("original_{}.png", self.stem))
    }

    pub fn mask(&self) -> PathBuf {
        self.dir.join(format!("mask_{}.png", self.stem))
    }

    /// Path for the `n`-th variant, 1-based.
    pub fn generated(&self, n: usize) -> PathBuf {
        self.dir.join(format!("generated_{}_{n}.png", self.stem))
    }

    pub fn grid(&self) -> PathBuf {
        self.dir.join(format!("grid_{}.png", self.stem))
    }
}

/// Writes run artifacts into one output directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Allocate the paths for a new run, stamped with the current unix time.
    pub fn begin_run(&self) -> ArtifactPaths {
        let id = Uuid::new_v4().simple().to_string();
        let stem = format!("{}-{}", chrono::Utc::now().timestamp(), &id[..RUN_ID_LEN]);
        ArtifactPaths::new(self.dir.clone(), stem)
    }

    /// Persist the decoded original and mask.
    pub fn write_inputs(
        &self,
        paths: &ArtifactPaths,
        original: &RgbImage,
        mask: &RgbImage,
    ) -> Result<(), CoreError> {
        self.ensure_dir()?;
        save_png(original, &paths.original())?;
        save_png(mask, &paths.mask())?;
        Ok(())
    }

    /// Persist the generated variants (numbered from 1) and the grid.
    pub fn write_outputs(
        &self,
        paths: &ArtifactPaths,
        variants: &[RgbImage],
        grid: &RgbImage,
    ) -> Result<(), CoreError> {
        self.ensure_dir()?;
        for (idx, variant) in variants.iter().enumerate() {
            save_png(variant, &paths.generated(idx + 1))?;
        }
        save_png(grid, &paths.grid())?;
        Ok(())
    }

    fn ensure_dir(&self) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }
}

fn save_png(image: &RgbImage, path: &Path) -> Result<(), CoreError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| match e {
            ImageError::IoError(io) => CoreError::Io(io),
            other => CoreError::Internal(format!("failed to write {}: {other}", path.display())),
        })?;
    tracing::debug!(path = %path.display(), "Wrote artifact");
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
