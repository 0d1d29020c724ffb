//! Domain building blocks for the hair inpainting preview service.
//!
//! Everything here is free of HTTP and backend concerns: image decoding and
//! resizing, the fixed generation parameters, contact-sheet composition, and
//! the best-effort artifact writer.

pub mod artifacts;
pub mod error;
pub mod grid;
pub mod imaging;
pub mod params;
