//! Request handlers.
//!
//! Handlers decode the request, delegate to `hairgen_core` and
//! `hairgen_inpaint`, and map failures via [`crate::error::AppError`].

pub mod generate;
