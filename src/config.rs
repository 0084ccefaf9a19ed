use crate::color::Rgba;
use crate::settings::{FieldConfig, LineStyle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// Construction-time options for a particle field. Every field is optional;
/// omitted fields fall back to the documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOptions {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub particle_count: Option<usize>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub max_link_distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub particle_radius: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub particle_color: Option<Rgba>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub line_color: Option<Rgba>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub speed_scale: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
}

/// Deserialize a field, treating a malformed value as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            log::warn!("ignoring malformed option value {}: {}", value, e);
            Ok(None)
        }
    }
}

impl FieldOptions {
    /// Layer `other` on top of `self`; fields set in `other` win
    pub fn overlay(self, other: FieldOptions) -> Self {
        Self {
            particle_count: other.particle_count.or(self.particle_count),
            max_link_distance: other.max_link_distance.or(self.max_link_distance),
            particle_radius: other.particle_radius.or(self.particle_radius),
            particle_color: other.particle_color.or(self.particle_color),
            line_color: other.line_color.or(self.line_color),
            speed_scale: other.speed_scale.or(self.speed_scale),
            line_style: other.line_style.or(self.line_style),
        }
    }

    /// Export options to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// Import options from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }
}

fn finite(name: &str, value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        Some(v) => {
            log::warn!("{} = {} is not a finite number, using {}", name, v, default);
            default
        }
        None => default,
    }
}

impl FieldConfig {
    /// Resolve options against the defaults. Never fails.
    pub fn from_options(options: &FieldOptions) -> Self {
        let defaults = FieldConfig::default();
        Self {
            particle_count: options.particle_count.unwrap_or(defaults.particle_count),
            max_link_distance: finite(
                "maxLinkDistance",
                options.max_link_distance,
                defaults.max_link_distance,
            ),
            particle_radius: finite(
                "particleRadius",
                options.particle_radius,
                defaults.particle_radius,
            ),
            particle_color: options.particle_color.unwrap_or(defaults.particle_color),
            line_color: options.line_color.unwrap_or(defaults.line_color),
            speed_scale: finite("speedScale", options.speed_scale, defaults.speed_scale),
            line_style: options.line_style.unwrap_or(defaults.line_style),
        }
    }
}

impl From<&FieldOptions> for FieldConfig {
    fn from(options: &FieldOptions) -> Self {
        FieldConfig::from_options(options)
    }
}

impl From<FieldConfig> for FieldOptions {
    fn from(config: FieldConfig) -> Self {
        Self {
            particle_count: Some(config.particle_count),
            max_link_distance: Some(config.max_link_distance),
            particle_radius: Some(config.particle_radius),
            particle_color: Some(config.particle_color),
            line_color: Some(config.line_color),
            speed_scale: Some(config.speed_scale),
            line_style: Some(config.line_style),
        }
    }
}
