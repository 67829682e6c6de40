//! # Flicker Common
//!
//! Common types and shared abstractions for Project Flicker.
//!
//! This crate provides the foundational types used by the kernel and the
//! engine host:
//! - Scene geometry (bounds, spawn regions)
//! - RGBA colors with named palette entries
//! - Configuration and runtime error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod coords;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::coords::*;
    pub use crate::error::*;
}

pub use prelude::*;
