//! Scene geometry: axis-aligned bounds and spawn regions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner (top-left in screen space)
    pub min: Vec2,
    /// Maximum corner (bottom-right in screen space)
    pub max: Vec2,
}

impl Bounds {
    /// Creates bounds from two corners, in any order.
    #[must_use]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates scene bounds anchored at the origin.
    #[must_use]
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width as f32, height as f32),
        }
    }

    /// Creates a square centered on `center` extending `half_extent` each way.
    #[must_use]
    pub fn centered(center: Vec2, half_extent: f32) -> Self {
        let half = Vec2::splat(half_extent.abs());
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Whether two rectangles overlap. Shared edges count as overlap.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y)
    }
}

/// Where a freshly spawned particle's position is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnRegion {
    /// A single point, jittered by the spawn offset
    Point(Vec2),
    /// A rectangle, grown by the spawn offset on every side
    Rect(Bounds),
}

impl From<Vec2> for SpawnRegion {
    fn from(point: Vec2) -> Self {
        Self::Point(point)
    }
}

impl From<Bounds> for SpawnRegion {
    fn from(bounds: Bounds) -> Self {
        Self::Rect(bounds)
    }
}
