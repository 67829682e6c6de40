//! Application frame loop.
//!
//! One frame: apply input, spawn into the trail and burst particle types,
//! update and cull both against the scene bounds, then draw both onto the
//! canvas. Optional PNG capture stands in for presenting the frame.

use anyhow::{Context, Result};
use flicker_common::Bounds;
use flicker_kernel::{Canvas, ParticleType, UpdateStats};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{EmitterSettings, EngineConfig};
use crate::input::{InputEvent, InputState, ScriptedInput};
use crate::timing::{frame_millis, ticks_from_millis, FpsCounter, FrameClock};

/// What happened during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Particles spawned this frame
    pub spawned: usize,
    /// Particles that ran out of life
    pub expired: usize,
    /// Particles culled for leaving the scene
    pub culled: usize,
    /// Particles alive after the frame
    pub live: usize,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Frames simulated
    pub frames: u64,
    /// Most particles alive at once
    pub peak_particles: usize,
    /// PNG frames written
    pub captured: u64,
}

/// Builds one particle type from its emitter settings.
fn build_type(
    settings: &EmitterSettings,
    max_particles: Option<usize>,
    seed: Option<u64>,
) -> Result<ParticleType> {
    let mut config = settings.particle.clone();
    if max_particles.is_some() {
        config.max_particles = max_particles;
    }
    let particle_type = ParticleType::new(config)?;
    Ok(match seed {
        Some(seed) => particle_type.with_seed(seed),
        None => particle_type,
    })
}

/// Particle effect application state.
#[derive(Debug)]
pub struct App {
    /// Engine configuration
    config: EngineConfig,
    /// Cursor trail particles
    trail: ParticleType,
    /// Click burst particles
    burst: ParticleType,
    /// Pointer state
    input: InputState,
    /// Frame being drawn
    canvas: Canvas,
    /// Scene rectangle used for culling
    scene: Bounds,
    /// Frames simulated so far
    frame: u64,
}

impl App {
    /// Creates the application, rejecting invalid particle settings.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let trail = build_type(&config.trail, config.max_particles, config.seed)
            .context("invalid trail particle settings")?;
        let burst = build_type(
            &config.burst,
            config.max_particles,
            config.seed.map(|s| s.wrapping_add(1)),
        )
        .context("invalid burst particle settings")?;

        let canvas = Canvas::new(config.window_width, config.window_height)?;
        let scene = canvas.bounds();

        info!(
            "Scene {}x{}, spawn policy {:?}, cap {:?}",
            config.window_width, config.window_height, config.spawn_policy, config.max_particles
        );

        Ok(Self {
            config,
            trail,
            burst,
            input: InputState::new(),
            canvas,
            scene,
            frame: 0,
        })
    }

    /// Cursor trail particle type.
    #[must_use]
    pub fn trail(&self) -> &ParticleType {
        &self.trail
    }

    /// Click burst particle type.
    #[must_use]
    pub fn burst(&self) -> &ParticleType {
        &self.burst
    }

    /// Most recently drawn frame.
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Live particles across both types.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.trail.len() + self.burst.len()
    }

    /// Frames simulated so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Whether input asked the loop to stop.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.input.quit_requested()
    }

    /// Runs one frame with the given input events and `dt` in ticks.
    pub fn step(&mut self, events: &[InputEvent], dt: f32) -> FrameStats {
        self.input.begin_frame();
        for &event in events {
            self.input.handle(event);
        }

        let mut spawned = 0;
        if let Some(cursor) = self.input.cursor() {
            let EmitterSettings { count, offset, .. } = self.config.trail;
            self.trail.add_particles(cursor, count, offset);
            spawned += count;
        }
        for origin in self.input.burst_origins(self.config.spawn_policy) {
            let EmitterSettings { count, offset, .. } = self.config.burst;
            self.burst.add_particles(origin, count, offset);
            spawned += count;
        }

        let removed: [UpdateStats; 2] = [
            self.trail.update_particles(self.scene, dt),
            self.burst.update_particles(self.scene, dt),
        ];

        self.canvas.clear(self.config.background);
        self.trail.draw_particles(&mut self.canvas);
        self.burst.draw_particles(&mut self.canvas);

        self.frame += 1;

        FrameStats {
            spawned,
            expired: removed.iter().map(|s| s.expired).sum(),
            culled: removed.iter().map(|s| s.culled).sum(),
            live: self.particle_count(),
        }
    }

    /// Runs the configured number of frames driven by scripted input.
    pub fn run(&mut self) -> Result<RunSummary> {
        let script = ScriptedInput::new(
            self.config.window_width,
            self.config.window_height,
            self.config.click_interval,
            self.config.hold_frames,
        );
        let fixed_dt = ticks_from_millis(frame_millis(self.config.target_fps));
        let mut clock = FrameClock::new(self.config.target_fps);
        let mut fps = FpsCounter::default();
        let mut summary = RunSummary::default();

        let capture_dir = match (&self.config.capture_dir, self.config.capture_every) {
            (Some(dir), every) if every > 0 => {
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating capture dir {}", dir.display()))?;
                Some(dir.clone())
            },
            _ => None,
        };

        info!(
            "Running {} frames at {} fps ({})",
            self.config.frames,
            self.config.target_fps,
            if self.config.realtime { "realtime" } else { "fixed step" }
        );

        clock.reset();
        for frame in 0..self.config.frames {
            let events = script.events_for_frame(frame);
            let dt = if self.config.realtime { clock.tick() } else { fixed_dt };

            let stats = self.step(&events, dt);
            fps.tick();
            summary.frames += 1;
            summary.peak_particles = summary.peak_particles.max(stats.live);

            debug!(
                "Frame {}: +{} spawned, {} expired, {} culled, {} live, held={}",
                frame,
                stats.spawned,
                stats.expired,
                stats.culled,
                stats.live,
                self.input.is_held()
            );

            if self.config.log_fps_every > 0 && frame % self.config.log_fps_every == 0 {
                info!("{:.0} fps, {} particles", fps.fps(), stats.live);
            }

            if let Some(dir) = &capture_dir {
                if frame % self.config.capture_every == 0 {
                    self.capture(&dir.join(format!("frame_{frame:05}.png")))?;
                    summary.captured += 1;
                }
            }

            if self.quit_requested() {
                info!("Quit requested after {} frames", summary.frames);
                break;
            }

            if self.config.realtime {
                clock.sleep_remainder();
            }
        }

        Ok(summary)
    }

    /// Writes the current frame as a PNG.
    pub fn capture(&self, path: &Path) -> Result<()> {
        self.canvas
            .save_png(path)
            .with_context(|| format!("writing frame {}", path.display()))?;
        debug!("Captured {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::SpawnPolicy;
    use flicker_common::ConfigError;
    use glam::Vec2;

    fn seeded_config() -> EngineConfig {
        EngineConfig {
            seed: Some(7),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_app_rejects_empty_palette() {
        let mut config = seeded_config();
        config.burst.particle.colors.clear();

        let err = App::new(config).expect_err("empty palette must fail");
        assert_eq!(
            err.root_cause().downcast_ref::<ConfigError>(),
            Some(&ConfigError::EmptyPalette)
        );
    }

    #[test]
    fn test_trail_spawns_at_cursor_every_frame() {
        let mut app = App::new(seeded_config()).expect("app");
        let cursor = Vec2::new(400.0, 300.0);

        let stats = app.step(&[InputEvent::PointerMoved(cursor)], 1.0);
        assert_eq!(stats.spawned, 10);
        assert_eq!(app.trail().len(), 10);
        assert!(app.burst().is_empty());

        let stats = app.step(&[], 1.0);
        assert_eq!(stats.spawned, 10);
    }

    #[test]
    fn test_click_spawns_burst() {
        let mut app = App::new(seeded_config()).expect("app");
        app.step(&[InputEvent::PrimaryPressed(Vec2::new(200.0, 200.0))], 1.0);
        assert_eq!(app.burst().len(), 5);

        // One-shot: holding does not add more
        app.step(&[], 1.0);
        assert_eq!(app.burst().len(), 5);
    }

    #[test]
    fn test_while_held_keeps_spawning() {
        let mut config = seeded_config();
        config.spawn_policy = SpawnPolicy::WhileHeld;
        let mut app = App::new(config).expect("app");

        app.step(&[InputEvent::PrimaryPressed(Vec2::new(200.0, 200.0))], 1.0);
        app.step(&[], 1.0);
        app.step(&[], 1.0);
        assert_eq!(app.burst().len(), 15);

        app.step(&[InputEvent::PrimaryReleased], 1.0);
        assert_eq!(app.burst().len(), 15);
    }

    #[test]
    fn test_global_cap_applies_to_both_types() {
        let mut config = seeded_config();
        config.max_particles = Some(25);
        let mut app = App::new(config).expect("app");

        for _ in 0..10 {
            app.step(&[InputEvent::PointerMoved(Vec2::new(400.0, 300.0))], 0.0);
        }
        assert_eq!(app.trail().len(), 25);
        assert_eq!(app.trail().max_particles(), Some(25));
        assert_eq!(app.burst().max_particles(), Some(25));
    }
}
