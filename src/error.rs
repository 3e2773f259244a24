//! Error type shared by the collision core.
//!
//! `NotInitialized` and `InvalidArgument` are sequencing bugs and abort scene
//! setup. `InvalidDelta` is absorbed by the movement system as a zero move.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    /// The collision grid was used before `initialize`.
    #[error("collision grid used before initialization")]
    NotInitialized,
    /// Non-positive cell size, degenerate world bounds, and similar.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A movement request with a NaN or infinite component.
    #[error("non-finite movement delta ({x}, {y})")]
    InvalidDelta { x: f32, y: f32 },
    /// A rectangle with a negative width or height.
    #[error("invalid bounds size {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },
}
