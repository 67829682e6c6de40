//! A single simulated particle.
//!
//! Time is measured in ticks, where one tick is 1/60 s. A particle's
//! lifetime doubles as its visual diameter: it starts as a circle
//! `lifetime` pixels wide and shrinks to nothing as `life_left` runs out,
//! fading from opaque to transparent along the way.

use flicker_common::{Bounds, ConfigError, Rgba};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::render::{RenderTarget, Sprite};

/// Maximum alpha value.
pub const MAX_ALPHA: f32 = 255.0;

/// How a particle's drawn size is meant to evolve over its life.
///
/// Stored on every particle and carried through from its type, but the
/// draw path always shrinks with `life_left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Radius shrinks as life runs out.
    #[default]
    Shrink,
    /// Radius grows as life runs out.
    Expand,
}

/// A single particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position in scene coordinates.
    pub position: Vec2,
    /// Velocity in pixels per tick.
    pub velocity: Vec2,
    /// Fill color.
    pub color: Rgba,
    /// Scale behavior inherited from the particle type.
    pub scale_mode: ScaleMode,
    lifetime: f32,
    life_left: f32,
    alpha: f32,
}

impl Particle {
    /// Creates a particle at full life and full opacity.
    ///
    /// Fails if `lifetime` is not a finite number greater than zero.
    pub fn new(
        position: Vec2,
        velocity: Vec2,
        lifetime: f32,
        color: Rgba,
        scale_mode: ScaleMode,
    ) -> Result<Self, ConfigError> {
        if !lifetime.is_finite() || lifetime <= 0.0 {
            return Err(ConfigError::InvalidLifetime(lifetime));
        }
        Ok(Self {
            position,
            velocity,
            color,
            scale_mode,
            lifetime,
            life_left: lifetime,
            alpha: MAX_ALPHA,
        })
    }

    /// Builds a particle from spawn draws whose lifetime is already known
    /// to be positive.
    pub(crate) fn spawned(
        position: Vec2,
        velocity: Vec2,
        lifetime: f32,
        color: Rgba,
        scale_mode: ScaleMode,
    ) -> Self {
        debug_assert!(lifetime > 0.0);
        Self {
            position,
            velocity,
            color,
            scale_mode,
            lifetime,
            life_left: lifetime,
            alpha: MAX_ALPHA,
        }
    }

    /// Total ticks-to-live at spawn.
    #[must_use]
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Ticks remaining before the particle dies.
    #[must_use]
    pub fn life_left(&self) -> f32 {
        self.life_left
    }

    /// Remaining life as a fraction in `[0, 1]`.
    #[must_use]
    pub fn life_fraction(&self) -> f32 {
        self.life_left / self.lifetime
    }

    /// Alpha as of the last update, `life_fraction * 255`.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Alpha truncated for drawing.
    #[must_use]
    pub fn alpha_u8(&self) -> u8 {
        self.alpha.clamp(0.0, MAX_ALPHA) as u8
    }

    /// Drawn radius: `life_left / 2`, truncated.
    #[must_use]
    pub fn radius(&self) -> u32 {
        (self.life_left / 2.0) as u32
    }

    /// Square covering the particle's full-size sprite.
    #[must_use]
    pub fn bounding_box(&self) -> Bounds {
        Bounds::centered(self.position, self.lifetime / 2.0)
    }

    /// Advances the particle by `dt` ticks.
    ///
    /// Position moves by the velocity before gravity is applied, so a
    /// particle spawned at rest does not move on its first tick.
    pub fn update(&mut self, gravity: f32, dt: f32) {
        self.position += self.velocity * dt;
        self.velocity.y += gravity * dt;
        self.life_left = (self.life_left - dt).max(0.0);
        self.alpha = self.life_fraction() * MAX_ALPHA;
    }

    /// Whether the particle has run out of life.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.life_left <= 0.0
    }

    /// Draws the particle onto `target`.
    ///
    /// The backing sprite is always `lifetime` pixels square so it stays
    /// centered on `position` while the circle inside it shrinks.
    pub fn draw<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        let size = self.lifetime.ceil() as u32;
        let mut sprite = Sprite::new(size, size);
        let half = self.lifetime / 2.0;
        sprite.fill_circle(Vec2::splat(half), self.radius(), self.color);
        sprite.set_alpha(self.alpha_u8());

        let origin = (self.position - Vec2::splat(half)).floor().as_ivec2();
        target.composite(&sprite, origin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Canvas;

    fn particle(lifetime: f32) -> Particle {
        Particle::new(
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
            lifetime,
            Rgba::RED,
            ScaleMode::Shrink,
        )
        .expect("valid particle")
    }

    #[test]
    fn test_new_particle_is_full() {
        let p = particle(10.0);
        assert_eq!(p.lifetime(), 10.0);
        assert_eq!(p.life_left(), 10.0);
        assert_eq!(p.alpha_u8(), 255);
        assert!(!p.is_dead());
    }

    #[test]
    fn test_rejects_bad_lifetime() {
        for lifetime in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let result = Particle::new(Vec2::ZERO, Vec2::ZERO, lifetime, Rgba::RED, ScaleMode::Shrink);
            assert!(matches!(result, Err(ConfigError::InvalidLifetime(_))));
        }
    }

    #[test]
    fn test_single_update_fades_alpha() {
        let mut p = particle(10.0);
        p.update(0.0, 1.0);

        assert_eq!(p.life_left(), 9.0);
        assert!((p.alpha() - 229.5).abs() < 1e-4);
        assert_eq!(p.alpha_u8(), 229);
        assert_eq!(p.position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_update_integrates_velocity_then_gravity() {
        let mut p = particle(50.0);
        p.velocity = Vec2::new(2.0, -1.0);

        p.update(0.5, 2.0);
        assert_eq!(p.position, Vec2::new(104.0, 98.0));
        assert_eq!(p.velocity, Vec2::new(2.0, 0.0));

        p.update(0.5, 2.0);
        assert_eq!(p.position, Vec2::new(108.0, 98.0));
        assert_eq!(p.velocity, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_n_updates() {
        let mut p = particle(24.0);
        p.velocity = Vec2::new(0.0, 3.0);
        let gravity = 0.2;

        for n in 1..=10 {
            p.update(gravity, 1.0);
            assert!((p.life_left() - (24.0 - n as f32)).abs() < 1e-4);
            assert!((p.velocity.y - (3.0 + gravity * n as f32)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_dies_exactly_at_ceil_lifetime_over_dt() {
        let mut p = particle(10.0);
        let dt = 3.0;
        // ceil(10 / 3) = 4 updates
        for _ in 0..3 {
            p.update(0.0, dt);
            assert!(!p.is_dead());
        }
        p.update(0.0, dt);
        assert!(p.is_dead());
        assert_eq!(p.life_left(), 0.0);
        assert_eq!(p.alpha_u8(), 0);
        assert_eq!(p.radius(), 0);
    }

    #[test]
    fn test_radius_and_bounding_box() {
        let mut p = particle(11.0);
        assert_eq!(p.radius(), 5);
        p.update(0.0, 2.0);
        assert_eq!(p.radius(), 4);

        let bbox = p.bounding_box();
        assert_eq!(bbox.min, Vec2::new(94.5, 94.5));
        assert_eq!(bbox.max, Vec2::new(105.5, 105.5));
    }

    #[test]
    fn test_draw_centers_on_position() {
        let mut canvas = Canvas::new(200, 200).expect("canvas");
        canvas.clear(Rgba::BLACK);
        particle(10.0).draw(&mut canvas);

        assert_eq!(canvas.pixel(100, 100), Some(Rgba::RED));
        assert_eq!(canvas.pixel(99, 99), Some(Rgba::RED));
        assert_eq!(canvas.pixel(107, 100), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(100, 93), Some(Rgba::BLACK));
    }

    #[test]
    fn test_draw_fades_with_life() {
        let mut canvas = Canvas::new(200, 200).expect("canvas");
        canvas.clear(Rgba::BLACK);
        let mut p = particle(10.0);
        p.update(0.0, 5.0);
        p.draw(&mut canvas);

        let center = canvas.pixel(100, 100).expect("pixel");
        assert!(center.r > 100 && center.r < 160, "half-faded red, got {center:?}");
    }

    #[test]
    fn test_longest_lifetime_draws_full_sprite() {
        use crate::particle_type::MAX_LIFETIME;

        let mut canvas = Canvas::new(200, 200).expect("canvas");
        canvas.clear(Rgba::BLACK);
        // A 1024px circle centered on the canvas covers all of it
        particle(MAX_LIFETIME as f32).draw(&mut canvas);
        assert_eq!(canvas.count_not(Rgba::RED), 0);
    }

    #[test]
    fn test_dead_particle_draws_nothing() {
        let mut canvas = Canvas::new(200, 200).expect("canvas");
        canvas.clear(Rgba::BLACK);
        let mut p = particle(10.0);
        p.update(0.0, 10.0);
        p.draw(&mut canvas);
        assert_eq!(canvas.count_not(Rgba::BLACK), 0);
    }
}
