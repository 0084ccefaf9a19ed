use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Color value handed to the drawing surface.
///
/// Channels are 8-bit, alpha is a fraction in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Channels as fractions, premultiplied by alpha
    pub fn premultiplied(&self) -> [f32; 4] {
        let a = self.a.clamp(0.0, 1.0);
        [
            self.r as f32 / 255.0 * a,
            self.g as f32 / 255.0 * a,
            self.b as f32 / 255.0 * a,
            a,
        ]
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name {
            "white" => Self::opaque(255, 255, 255),
            "black" => Self::opaque(0, 0, 0),
            "red" => Self::opaque(255, 0, 0),
            "green" => Self::opaque(0, 128, 0),
            "blue" => Self::opaque(0, 0, 255),
            "cyan" => Self::opaque(0, 255, 255),
            "magenta" => Self::opaque(255, 0, 255),
            "yellow" => Self::opaque(255, 255, 0),
            "gray" | "grey" => Self::opaque(128, 128, 128),
            _ => return None,
        };
        Some(color)
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
        match hex.len() {
            3 => Some(Self::opaque(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Some(Self::opaque(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)? as f32 / 255.0)),
            _ => None,
        }
    }

    fn from_function(args: &str, with_alpha: bool) -> Option<Self> {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }
        let channel = |s: &str| s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
        let alpha = if with_alpha {
            let a = parts[3].parse::<f32>().ok()?;
            if !a.is_finite() {
                return None;
            }
            a.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Some(Self::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, alpha))
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::opaque(255, 255, 255)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let parsed = if let Some(hex) = s.strip_prefix('#') {
            Self::from_hex(hex)
        } else if let Some(args) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
            Self::from_function(args, true)
        } else if let Some(args) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            Self::from_function(args, false)
        } else {
            Self::named(&s)
        };
        parsed.ok_or_else(|| format!("Unrecognized color: {}", s))
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
