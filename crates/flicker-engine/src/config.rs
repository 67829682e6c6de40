//! Engine configuration.
//!
//! Provides scene, emitter, input-script and capture settings.
//! Configuration can be loaded from and saved to a TOML file.

use flicker_common::Rgba;
use flicker_kernel::ParticleTypeConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::input::SpawnPolicy;

/// Configuration file name.
const CONFIG_FILE: &str = "flicker.toml";

/// Upper bound on particles spawned per emitter per frame.
const MAX_SPAWN_COUNT: usize = 10_000;

/// How one particle type is spawned each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitterSettings {
    /// Particles per spawn event
    pub count: usize,
    /// Jitter around the spawn point, in pixels
    pub offset: u32,
    /// Spawn ranges, palette and gravity
    pub particle: ParticleTypeConfig,
}

impl EmitterSettings {
    /// Cursor trail: 10 particles per frame, 5px jitter.
    #[must_use]
    pub fn cursor_trail() -> Self {
        Self {
            count: 10,
            offset: 5,
            particle: ParticleTypeConfig::cursor_trail(),
        }
    }

    /// Click burst: 5 particles per click, 20px jitter.
    #[must_use]
    pub fn click_burst() -> Self {
        Self {
            count: 5,
            offset: 20,
            particle: ParticleTypeConfig::click_burst(),
        }
    }
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Scene Settings ===
    /// Scene width in pixels
    pub window_width: u32,
    /// Scene height in pixels
    pub window_height: u32,
    /// Target frames per second
    pub target_fps: u32,
    /// Frames to run before exiting
    pub frames: u64,
    /// Pace frames against the wall clock instead of a fixed step
    pub realtime: bool,
    /// Clear color
    pub background: Rgba,

    // === Simulation Settings ===
    /// RNG seed (None = random)
    pub seed: Option<u64>,
    /// How click bursts are emitted
    pub spawn_policy: SpawnPolicy,
    /// Soft cap applied to every particle type (None = per-type setting)
    pub max_particles: Option<usize>,

    // === Scripted Input ===
    /// Frames between scripted clicks (0 = no clicks)
    pub click_interval: u64,
    /// Frames each scripted click is held
    pub hold_frames: u64,

    // === Capture & Debug ===
    /// Directory for captured PNG frames (None = no capture)
    pub capture_dir: Option<PathBuf>,
    /// Capture every Nth frame (0 = never)
    pub capture_every: u64,
    /// Log FPS and particle counts every Nth frame (0 = never)
    pub log_fps_every: u64,

    // === Emitters ===
    /// Cursor trail emitter
    pub trail: EmitterSettings,
    /// Click burst emitter
    pub burst: EmitterSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Scene
            window_width: 800,
            window_height: 600,
            target_fps: 60,
            frames: 600,
            realtime: false,
            background: Rgba::BLACK,

            // Simulation
            seed: None,
            spawn_policy: SpawnPolicy::OneShotBurst,
            max_particles: None,

            // Scripted input
            click_interval: 45,
            hold_frames: 10,

            // Capture & debug
            capture_dir: None,
            capture_every: 0,
            log_fps_every: 60,

            // Emitters
            trail: EmitterSettings::cursor_trail(),
            burst: EmitterSettings::click_burst(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs_config_path() {
            config_dir.join("flicker").join(CONFIG_FILE)
        } else {
            PathBuf::from(CONFIG_FILE)
        }
    }

    /// Clamp configuration values to sensible ranges.
    ///
    /// Particle ranges and palettes are not touched here; those are
    /// rejected when the particle types are built.
    pub fn validate(&mut self) {
        // Scene
        self.window_width = self.window_width.clamp(64, 7680);
        self.window_height = self.window_height.clamp(64, 4320);
        self.target_fps = self.target_fps.clamp(1, 240);

        // Emitters
        let max_offset = self.window_width.max(self.window_height);
        for emitter in [&mut self.trail, &mut self.burst] {
            emitter.count = emitter.count.min(MAX_SPAWN_COUNT);
            emitter.offset = emitter.offset.min(max_offset);
        }

        // Scripted input
        if self.click_interval > 0 {
            self.hold_frames = self.hold_frames.min(self.click_interval);
        }
    }
}

/// Get platform-specific config directory.
fn dirs_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}
