//! # Flicker Kernel
//!
//! Particle simulation kernel for Project Flicker.
//!
//! This crate contains the whole simulation and lifecycle engine:
//! - [`Particle`]: a single particle that moves, falls, fades and shrinks
//! - [`ParticleType`]: an emitter owning a homogeneous set of particles,
//!   with stochastic spawning, per-frame update and bounds culling
//! - [`render`]: the software compositing target particles draw onto

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod particle;
pub mod particle_type;
pub mod render;

pub use particle::{Particle, ScaleMode, MAX_ALPHA};
pub use particle_type::{ParticleType, ParticleTypeConfig, UpdateStats, MAX_LIFETIME};
pub use render::{Canvas, RenderTarget, Sprite};
