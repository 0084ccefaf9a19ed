use crate::color::Rgba;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PARTICLE_COUNT: usize = 50;
pub const DEFAULT_MAX_LINK_DISTANCE: f64 = 100.0;
pub const DEFAULT_PARTICLE_RADIUS: f64 = 2.0;
pub const DEFAULT_PARTICLE_COLOR: Rgba = Rgba::new(255, 255, 255, 0.8);
pub const DEFAULT_LINE_COLOR: Rgba = Rgba::new(255, 255, 255, 0.3);
pub const DEFAULT_SPEED_SCALE: f64 = 1.0;

/// Stroke style for the lines linking nearby particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
    #[serde(alias = "dash-dotted", alias = "dashdot")]
    DashDot,
}

impl LineStyle {
    pub fn name(&self) -> &str {
        match self {
            LineStyle::Solid => "Solid",
            LineStyle::Dotted => "Dotted",
            LineStyle::Dashed => "Dashed",
            LineStyle::DashDot => "Dash-Dot",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            LineStyle::Solid => LineStyle::Dotted,
            LineStyle::Dotted => LineStyle::Dashed,
            LineStyle::Dashed => LineStyle::DashDot,
            LineStyle::DashDot => LineStyle::Solid,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LineStyle::Solid => LineStyle::DashDot,
            LineStyle::Dotted => LineStyle::Solid,
            LineStyle::Dashed => LineStyle::Dotted,
            LineStyle::DashDot => LineStyle::Dashed,
        }
    }

    /// Alternating on/off stroke lengths; empty means a solid stroke
    pub fn dash_pattern(&self) -> &'static [f64] {
        match self {
            LineStyle::Solid => &[],
            LineStyle::Dotted => &[2.0, 4.0],
            LineStyle::Dashed => &[10.0, 10.0],
            LineStyle::DashDot => &[10.0, 5.0, 2.0, 5.0],
        }
    }

    /// Parse a style name, or `None` if it names no style
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "solid" => Some(LineStyle::Solid),
            "dotted" | "dot" => Some(LineStyle::Dotted),
            "dashed" | "dash" => Some(LineStyle::Dashed),
            "dash-dot" | "dash-dotted" | "dashdot" => Some(LineStyle::DashDot),
            _ => None,
        }
    }

    /// Parse a style name; unknown names are solid
    pub fn parse(s: &str) -> Self {
        Self::from_name(s).unwrap_or_else(|| {
            log::warn!("Unknown line style '{}', using solid", s.trim());
            LineStyle::Solid
        })
    }
}

/// Immutable configuration snapshot captured by a particle field at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    /// Number of particles seeded on every (re)initialization
    pub particle_count: usize,
    /// Pairs at this distance or farther are never linked; 0 disables links
    pub max_link_distance: f64,
    /// Radius of each particle dot, in pixels
    pub particle_radius: f64,
    pub particle_color: Rgba,
    pub line_color: Rgba,
    /// Scales the random velocity draw of [-0.5, 0.5) per axis
    pub speed_scale: f64,
    pub line_style: LineStyle,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            max_link_distance: DEFAULT_MAX_LINK_DISTANCE,
            particle_radius: DEFAULT_PARTICLE_RADIUS,
            particle_color: DEFAULT_PARTICLE_COLOR,
            line_color: DEFAULT_LINE_COLOR,
            speed_scale: DEFAULT_SPEED_SCALE,
            line_style: LineStyle::default(),
        }
    }
}

impl FieldConfig {
    /// Copy with the particle count shifted by `delta`, kept within 0..=2000
    pub fn with_particle_delta(self, delta: i64) -> Self {
        let count = (self.particle_count as i64 + delta).clamp(0, 2000) as usize;
        Self {
            particle_count: count,
            ..self
        }
    }

    /// Copy with the link distance shifted by `delta`, never below zero
    pub fn with_link_delta(self, delta: f64) -> Self {
        Self {
            max_link_distance: (self.max_link_distance + delta).max(0.0),
            ..self
        }
    }

    pub fn with_line_style(self, line_style: LineStyle) -> Self {
        Self { line_style, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FieldConfig::default();
        assert_eq!(config.particle_count, 50);
        assert_eq!(config.max_link_distance, 100.0);
        assert_eq!(config.particle_radius, 2.0);
        assert_eq!(config.speed_scale, 1.0);
        assert_eq!(config.line_style, LineStyle::Solid);
        assert_eq!(config.particle_color, Rgba::new(255, 255, 255, 0.8));
        assert_eq!(config.line_color, Rgba::new(255, 255, 255, 0.3));
    }

    #[test]
    fn test_dash_patterns() {
        assert!(LineStyle::Solid.dash_pattern().is_empty());
        assert_eq!(LineStyle::Dotted.dash_pattern(), &[2.0, 4.0]);
        assert_eq!(LineStyle::Dashed.dash_pattern(), &[10.0, 10.0]);
        assert_eq!(LineStyle::DashDot.dash_pattern(), &[10.0, 5.0, 2.0, 5.0]);
    }

    #[test]
    fn test_line_style_cycle() {
        let mut style = LineStyle::Solid;
        for _ in 0..4 {
            assert_eq!(style.next().prev(), style);
            style = style.next();
        }
        assert_eq!(style, LineStyle::Solid);
    }

    #[test]
    fn test_line_style_parse() {
        assert_eq!(LineStyle::parse("dash-dotted"), LineStyle::DashDot);
        assert_eq!(LineStyle::parse("DOTTED"), LineStyle::Dotted);
        assert_eq!(LineStyle::parse("wavy"), LineStyle::Solid);
    }

    #[test]
    fn test_line_style_from_name_rejects_unknown() {
        assert_eq!(LineStyle::from_name(" Solid "), Some(LineStyle::Solid));
        assert_eq!(LineStyle::from_name("dash"), Some(LineStyle::Dashed));
        assert_eq!(LineStyle::from_name("wavy"), None);
        assert_eq!(LineStyle::from_name(""), None);
    }

    #[test]
    fn test_line_style_serde_names() {
        let json = serde_json::to_string(&LineStyle::DashDot).unwrap();
        assert_eq!(json, "\"dash-dot\"");
        let parsed: LineStyle = serde_json::from_str("\"dash-dotted\"").unwrap();
        assert_eq!(parsed, LineStyle::DashDot);
    }

    #[test]
    fn test_adjustments_stay_non_negative() {
        let config = FieldConfig::default();
        assert_eq!(config.with_particle_delta(-500).particle_count, 0);
        assert_eq!(config.with_link_delta(-500.0).max_link_distance, 0.0);
        assert_eq!(config.with_particle_delta(10).particle_count, 60);
    }
}
