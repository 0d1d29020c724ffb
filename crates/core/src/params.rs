//! Fixed sampling configuration for hair previews.
//!
//! The service runs a single prompt/parameter combination. The values here
//! are process-wide constants; [`GenerationParameters::hair_preview`] is the
//! only constructor used outside of tests.

/* --------------------------------------------------------------------------
Named constants
-------------------------------------------------------------------------- */

/// Prompt steering the inpainting model toward realistic, character-fitting hair.
pub const HAIR_PROMPT: &str = "Create a realistic image of human hair that best suits the \
personality of a specific character. The hair should have natural texture, color, and volume, \
and be detailed and lifelike, suitable for close-up views or character modeling. The hair type, \
color, and style should complement the character's personality and overall appearance. The \
character has a confident and sophisticated personality.";

/// Classifier-free guidance scale.
pub const GUIDANCE_SCALE: f32 = 7.5;

/// Number of variants generated per request.
pub const SAMPLE_COUNT: usize = 3;

/// Sampler seed. Fixed so identical inputs yield identical outputs.
pub const SEED: u64 = 0;

/// Model input edge length in pixels.
pub const MODEL_INPUT_SIZE: u32 = 512;

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
}

/// Immutable sampling configuration handed to the inpainting backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParameters {
    pub prompt: String,
    pub guidance_scale: f32,
    pub sample_count: usize,
    pub seed: u64,
    pub resolution: Resolution,
}

impl GenerationParameters {
    /// The hair preview configuration: fixed prompt, guidance 7.5, 3 samples,
    /// seed 0, 512x512.
    pub fn hair_preview() -> Self {
        Self {
            prompt: HAIR_PROMPT.to_string(),
            guidance_scale: GUIDANCE_SCALE,
            sample_count: SAMPLE_COUNT,
            seed: SEED,
            resolution: Resolution::square(MODEL_INPUT_SIZE),
        }
    }

    /// Number of tiles in the preview grid: the original plus every variant.
    pub fn grid_columns(&self) -> usize {
        self.sample_count + 1
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
