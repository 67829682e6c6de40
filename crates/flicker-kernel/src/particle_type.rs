//! Particle types: emitters that own a homogeneous set of particles.
//!
//! A [`ParticleType`] holds the spawn-parameter ranges shared by all of its
//! particles and is the sole owner of those particles. The host drives it
//! once per frame:
//!
//! 1. [`ParticleType::add_particles`] at the cursor or click position
//! 2. [`ParticleType::update_particles`] with the scene bounds and dt
//! 3. [`ParticleType::draw_particles`] onto the frame
//!
//! # Example
//!
//! ```
//! use flicker_common::Bounds;
//! use flicker_kernel::particle_type::{ParticleType, ParticleTypeConfig};
//! use glam::Vec2;
//!
//! let mut trail = ParticleType::new(ParticleTypeConfig::cursor_trail())
//!     .expect("preset is valid")
//!     .with_seed(7);
//!
//! trail.add_particles(Vec2::new(400.0, 300.0), 10, 5);
//! assert_eq!(trail.len(), 10);
//!
//! trail.update_particles(Bounds::from_size(800, 600), 1.0);
//! ```

use flicker_common::{Bounds, ConfigError, Rgba, SpawnRegion};
use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::particle::{Particle, ScaleMode};
use crate::render::RenderTarget;

/// Longest lifetime a particle type may draw, in ticks.
///
/// A particle's sprite is `lifetime` pixels square, so this also bounds the
/// per-particle draw cost.
pub const MAX_LIFETIME: u32 = 1024;

/// Spawn parameters for a particle type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleTypeConfig {
    /// Componentwise (min, max) velocity in pixels per tick.
    pub velocity_range: (IVec2, IVec2),
    /// Lifetime range in ticks. Endpoints may be given in either order.
    pub lifetime_range: (u32, u32),
    /// Palette that particle colors are drawn from.
    pub colors: Vec<Rgba>,
    /// Downward acceleration applied every tick.
    #[serde(default)]
    pub gravity: f32,
    /// Scale mode handed to spawned particles.
    #[serde(default)]
    pub scale_mode: ScaleMode,
    /// Soft cap on live particles. Oldest particles are evicted first.
    #[serde(default)]
    pub max_particles: Option<usize>,
}

impl ParticleTypeConfig {
    /// Small red particles that trail the cursor and sag under gravity.
    #[must_use]
    pub fn cursor_trail() -> Self {
        Self {
            velocity_range: (IVec2::new(-2, -2), IVec2::new(2, 2)),
            lifetime_range: (4, 24),
            colors: vec![Rgba::RED],
            gravity: 0.2,
            scale_mode: ScaleMode::Shrink,
            max_particles: None,
        }
    }

    /// Larger whitish particles thrown out on click.
    #[must_use]
    pub fn click_burst() -> Self {
        Self {
            velocity_range: (IVec2::new(-4, -4), IVec2::new(4, 4)),
            lifetime_range: (24, 48),
            colors: vec![Rgba::WHITE, Rgba::WHITESMOKE, Rgba::GHOSTWHITE, Rgba::GRAY90],
            gravity: 0.0,
            scale_mode: ScaleMode::Shrink,
            max_particles: None,
        }
    }

    /// Sets the gravity.
    #[must_use]
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Sets the soft particle cap.
    #[must_use]
    pub fn with_max_particles(mut self, max: Option<usize>) -> Self {
        self.max_particles = max;
        self
    }

    /// Checks the config without building a particle type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        let (a, b) = self.lifetime_range;
        if a.min(b) == 0 {
            return Err(ConfigError::InvalidLifetime(0.0));
        }
        if a.max(b) > MAX_LIFETIME {
            return Err(ConfigError::InvalidLifetime(a.max(b) as f32));
        }
        let (lo, hi) = self.velocity_range;
        if lo.x > hi.x {
            return Err(ConfigError::InvalidVelocityRange {
                axis: 'x',
                min: lo.x,
                max: hi.x,
            });
        }
        if lo.y > hi.y {
            return Err(ConfigError::InvalidVelocityRange {
                axis: 'y',
                min: lo.y,
                max: hi.y,
            });
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::InvalidGravity(self.gravity));
        }
        Ok(())
    }
}

/// What one call to [`ParticleType::update_particles`] removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateStats {
    /// Particles removed because their life ran out.
    pub expired: usize,
    /// Particles removed because they left the scene.
    pub culled: usize,
}

/// An emitter owning a homogeneous collection of live particles.
pub struct ParticleType {
    particles: Vec<Particle>,
    velocity_range: (IVec2, IVec2),
    lifetime_range: (u32, u32),
    colors: Vec<Rgba>,
    gravity: f32,
    scale_mode: ScaleMode,
    max_particles: Option<usize>,
    rng: fastrand::Rng,
}

impl ParticleType {
    /// Creates an empty particle type.
    ///
    /// Fails fast on an empty palette, a zero lifetime endpoint, an
    /// inverted velocity range or non-finite gravity.
    pub fn new(config: ParticleTypeConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let (a, b) = config.lifetime_range;
        debug!(
            "Created particle type: velocity {:?}..{:?}, lifetime {}..{}, {} colors, gravity {}",
            config.velocity_range.0,
            config.velocity_range.1,
            a.min(b),
            a.max(b),
            config.colors.len(),
            config.gravity
        );

        Ok(Self {
            particles: Vec::new(),
            velocity_range: config.velocity_range,
            lifetime_range: (a.min(b), a.max(b)),
            colors: config.colors,
            gravity: config.gravity,
            scale_mode: config.scale_mode,
            max_particles: config.max_particles,
            rng: fastrand::Rng::new(),
        })
    }

    /// Reseeds the spawn RNG so runs are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether there are no live particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Live particles, oldest first.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Gravity applied to every particle.
    #[must_use]
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Scale mode handed to new particles.
    #[must_use]
    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    /// Current soft cap, if any.
    #[must_use]
    pub fn max_particles(&self) -> Option<usize> {
        self.max_particles
    }

    /// Changes the soft cap. Takes effect on the next spawn.
    pub fn set_max_particles(&mut self, max: Option<usize>) {
        self.max_particles = max;
    }

    /// Drops every live particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Draws one particle without adding it to the collection.
    ///
    /// Jitter and velocity are whole numbers. A rectangle is snapped
    /// outward to whole pixels and grown by `offset` on every side; a point
    /// is rounded to the nearest pixel and shifted by up to `offset` on each
    /// axis.
    pub fn spawn_particle(&mut self, region: impl Into<SpawnRegion>, offset: u32) -> Particle {
        let offset = i32::try_from(offset).unwrap_or(i32::MAX);

        let position = match region.into() {
            SpawnRegion::Rect(bounds) => {
                // Public fields allow inverted corners
                let lo = bounds.min.min(bounds.max);
                let hi = bounds.min.max(bounds.max);
                let min = lo.floor().as_ivec2();
                let max = hi.ceil().as_ivec2();
                Vec2::new(
                    self.rng.i32(min.x.saturating_sub(offset)..=max.x.saturating_add(offset)) as f32,
                    self.rng.i32(min.y.saturating_sub(offset)..=max.y.saturating_add(offset)) as f32,
                )
            },
            SpawnRegion::Point(point) => {
                let jitter = IVec2::new(
                    self.rng.i32(-offset..=offset),
                    self.rng.i32(-offset..=offset),
                );
                point.round() + jitter.as_vec2()
            },
        };

        let (lo, hi) = self.velocity_range;
        let velocity = IVec2::new(self.rng.i32(lo.x..=hi.x), self.rng.i32(lo.y..=hi.y)).as_vec2();

        let lifetime = self.rng.u32(self.lifetime_range.0..=self.lifetime_range.1) as f32;
        let color = self.colors[self.rng.usize(..self.colors.len())];

        Particle::spawned(position, velocity, lifetime, color, self.scale_mode)
    }

    /// Spawns `count` independent particles and appends them.
    ///
    /// With a soft cap set, the oldest particles are evicted until the
    /// collection is back at the cap.
    pub fn add_particles(&mut self, region: impl Into<SpawnRegion>, count: usize, offset: u32) {
        let region = region.into();
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = self.spawn_particle(region, offset);
            self.particles.push(particle);
        }

        if let Some(max) = self.max_particles {
            let excess = self.particles.len().saturating_sub(max);
            if excess > 0 {
                self.particles.drain(..excess);
                debug!("Evicted {} oldest particles (cap {})", excess, max);
            }
        }
    }

    /// Advances every particle by `dt` ticks and removes the ones that died
    /// or whose bounding box left `scene`.
    ///
    /// Negative or NaN `dt` is treated as zero. Survivors keep their
    /// relative order.
    pub fn update_particles(&mut self, scene: Bounds, dt: f32) -> UpdateStats {
        let mut stats = UpdateStats::default();
        if self.particles.is_empty() {
            return stats;
        }

        let dt = dt.max(0.0);
        let gravity = self.gravity;

        self.particles.retain_mut(|particle| {
            particle.update(gravity, dt);
            if particle.is_dead() {
                stats.expired += 1;
                return false;
            }
            if !scene.intersects(&particle.bounding_box()) {
                stats.culled += 1;
                return false;
            }
            true
        });

        trace!(
            "Particle update: {} expired, {} culled, {} live",
            stats.expired,
            stats.culled,
            self.particles.len()
        );
        stats
    }

    /// Draws every live particle in storage order.
    pub fn draw_particles<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        for particle in &self.particles {
            particle.draw(target);
        }
    }
}

impl std::fmt::Debug for ParticleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleType")
            .field("particle_count", &self.particles.len())
            .field("velocity_range", &self.velocity_range)
            .field("lifetime_range", &self.lifetime_range)
            .field("colors", &self.colors.len())
            .field("gravity", &self.gravity)
            .field("scale_mode", &self.scale_mode)
            .field("max_particles", &self.max_particles)
            .finish_non_exhaustive()
    }
}
