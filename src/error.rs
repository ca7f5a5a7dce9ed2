//! Error types for the surface data engine.

use thiserror::Error;

/// Surface data errors.
///
/// Most operations in this crate cannot fail: unknown handles are benign
/// no-ops and an empty result list is a valid query outcome. Errors are
/// reserved for inputs that have no meaningful interpretation.
#[derive(Error, Debug)]
pub enum SurfaceDataError {
    /// Region query step with a non-positive or non-finite component.
    #[error("Invalid query step ({x}, {y}): step components must be finite and positive")]
    InvalidStep { x: f32, y: f32 },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for surface data operations.
pub type Result<T> = std::result::Result<T, SurfaceDataError>;
