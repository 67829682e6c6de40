//! RGBA colors and the named palette used by particle configs.

use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 8-bit RGBA color. Layout matches one pixel of an RGBA8 image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(C)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Off-white.
    pub const WHITESMOKE: Self = Self::rgb(245, 245, 245);
    /// Blue-tinted white.
    pub const GHOSTWHITE: Self = Self::rgb(248, 248, 255);
    /// Very light gray.
    pub const GRAY90: Self = Self::rgb(229, 229, 229);
    /// Gold, as used for HUD text.
    pub const GOLD: Self = Self::rgb(255, 215, 0);

    /// Creates a color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Looks up a color by name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "transparent" => Self::TRANSPARENT,
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" => Self::rgb(0, 255, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "orange" => Self::rgb(255, 165, 0),
            "cyan" => Self::rgb(0, 255, 255),
            "magenta" => Self::rgb(255, 0, 255),
            "gold" => Self::GOLD,
            "whitesmoke" => Self::WHITESMOKE,
            "ghostwhite" => Self::GHOSTWHITE,
            "gray90" | "grey90" => Self::GRAY90,
            "gray" | "grey" => Self::rgb(190, 190, 190),
            _ => return None,
        };
        Some(color)
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }
}

impl FromStr for Rgba {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::from_hex(trimmed)
            .or_else(|| Self::from_name(trimmed))
            .ok_or_else(|| ConfigError::UnknownColor(s.to_string()))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!("red".parse::<Rgba>(), Ok(Rgba::RED));
        assert_eq!("WhiteSmoke".parse::<Rgba>(), Ok(Rgba::WHITESMOKE));
        assert_eq!("grey90".parse::<Rgba>(), Ok(Rgba::GRAY90));
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!("#ff8000".parse::<Rgba>(), Ok(Rgba::rgb(255, 128, 0)));
        assert_eq!("#10203040".parse::<Rgba>(), Ok(Rgba::new(16, 32, 48, 64)));
        assert!("#12345".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_unknown_color() {
        assert_eq!(
            "chartreuse-ish".parse::<Rgba>(),
            Err(ConfigError::UnknownColor("chartreuse-ish".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for color in [Rgba::GOLD, Rgba::new(248, 248, 255, 12)] {
            assert_eq!(color.to_string().parse::<Rgba>(), Ok(color));
        }
    }

    #[test]
    fn test_pod_layout() {
        let pixels = [Rgba::new(1, 2, 3, 4)];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels);
        assert_eq!(bytes, &[1, 2, 3, 4]);
    }
}
