//! Error types for Project Flicker.

use thiserror::Error;

/// Top-level error type for Flicker operations.
#[derive(Debug, Error)]
pub enum FlickerError {
    /// Invalid particle or scene configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding errors
    #[error("Image error: {0}")]
    Image(String),
}

/// Invalid construction parameters.
///
/// These are precondition violations caught when a particle, particle type
/// or canvas is built. Nothing in the per-frame path returns them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A particle type was given no colors to draw from
    #[error("color palette must contain at least one color")]
    EmptyPalette,

    /// Lifetime must be finite and greater than zero
    #[error("particle lifetime must be finite and greater than zero, got {0}")]
    InvalidLifetime(f32),

    /// Velocity range minimum exceeds maximum on one axis
    #[error("velocity range on {axis} axis is inverted: min {min} > max {max}")]
    InvalidVelocityRange {
        /// Axis name ('x' or 'y')
        axis: char,
        /// Lower bound given
        min: i32,
        /// Upper bound given
        max: i32,
    },

    /// Gravity must be a finite number
    #[error("gravity must be finite, got {0}")]
    InvalidGravity(f32),

    /// Color string is neither a known name nor a hex literal
    #[error("unknown color: {0:?}")]
    UnknownColor(String),

    /// Render surfaces need a non-zero size
    #[error("canvas size must be non-zero, got {width}x{height}")]
    InvalidCanvas {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// Result type alias for Flicker operations.
pub type FlickerResult<T> = Result<T, FlickerError>;
