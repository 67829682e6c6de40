//! Flicker Engine - host for the Flicker particle effects.
//!
//! This crate provides the frame loop, pointer input policy, frame timing
//! and PNG frame capture around the particle kernel.
