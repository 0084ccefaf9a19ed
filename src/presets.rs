use crate::color::Rgba;
use crate::config::FieldOptions;
use crate::settings::LineStyle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A named set of field options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub options: FieldOptions,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        options: FieldOptions,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
    dir: Option<PathBuf>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl PresetManager {
    /// Built-in presets plus user presets from the config directory
    pub fn new() -> Self {
        Self::with_dir(Self::presets_dir())
    }

    /// Built-in presets plus user presets from `dir`, if any
    pub fn with_dir(dir: Option<PathBuf>) -> Self {
        let mut manager = Self {
            builtin: Self::builtin_presets(),
            user: Vec::new(),
            dir,
        };
        manager.load_user_presets();
        manager
    }

    fn builtin_presets() -> Vec<Preset> {
        vec![
            Preset::new("Default", "White dots with solid fading links", FieldOptions::default()),
            Preset::new(
                "Constellation",
                "Sparse slow stars joined by long dotted lines",
                FieldOptions {
                    particle_count: Some(35),
                    max_link_distance: Some(140.0),
                    particle_radius: Some(1.5),
                    speed_scale: Some(0.5),
                    line_style: Some(LineStyle::Dotted),
                    ..Default::default()
                },
            ),
            Preset::new(
                "Mesh",
                "Dense crowd with short links",
                FieldOptions {
                    particle_count: Some(150),
                    max_link_distance: Some(40.0),
                    particle_radius: Some(1.0),
                    ..Default::default()
                },
            ),
            Preset::new(
                "Drift",
                "Large, nearly still particles",
                FieldOptions {
                    particle_count: Some(25),
                    particle_radius: Some(3.0),
                    speed_scale: Some(0.2),
                    ..Default::default()
                },
            ),
            Preset::new(
                "Blueprint",
                "Cyan dashed wiring",
                FieldOptions {
                    particle_color: Some(Rgba::new(0, 200, 255, 0.9)),
                    line_color: Some(Rgba::new(0, 160, 255, 0.5)),
                    line_style: Some(LineStyle::Dashed),
                    ..Default::default()
                },
            ),
            Preset::new(
                "Telegraph",
                "Fast amber particles with dash-dot links",
                FieldOptions {
                    particle_count: Some(60),
                    particle_color: Some(Rgba::new(255, 190, 60, 0.9)),
                    line_color: Some(Rgba::new(255, 160, 40, 0.4)),
                    speed_scale: Some(2.0),
                    line_style: Some(LineStyle::DashDot),
                    ..Default::default()
                },
            ),
        ]
    }

    /// Get the presets directory path
    fn presets_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("particle-field").join("presets"))
    }

    fn preset_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}.json", sanitize(name)))
    }

    /// Load user presets from disk; unreadable files are skipped
    fn load_user_presets(&mut self) {
        let Some(dir) = self.dir.as_ref().filter(|d| d.exists()) else {
            return;
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            match fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|content| serde_json::from_str::<Preset>(&content).map_err(|e| e.to_string()))
            {
                Ok(preset) => self.user.push(preset),
                Err(e) => log::warn!("skipping preset {}: {}", path.display(), e),
            }
        }
        log::debug!("loaded {} user presets", self.user.len());
    }

    /// Save a preset to disk, replacing any user preset with the same name
    pub fn save_preset(&mut self, preset: Preset) -> Result<(), String> {
        let dir = self.dir.as_ref().ok_or("Could not determine config directory")?;

        fs::create_dir_all(dir).map_err(|e| format!("Failed to create presets directory: {}", e))?;

        let path = Self::preset_path(dir, &preset.name);
        let json = serde_json::to_string_pretty(&preset)
            .map_err(|e| format!("Failed to serialize preset: {}", e))?;
        fs::write(&path, json).map_err(|e| format!("Failed to write preset file: {}", e))?;

        self.user.retain(|p| p.name != preset.name);
        self.user.push(preset);
        Ok(())
    }

    /// Delete a user preset
    pub fn delete_preset(&mut self, name: &str) -> Result<(), String> {
        let dir = self.dir.as_ref().ok_or("Could not determine config directory")?;

        self.user.retain(|p| p.name != name);

        let path = Self::preset_path(dir, name);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| format!("Failed to delete preset file: {}", e))?;
        }
        Ok(())
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.all_presets().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Preset at `index` in [`PresetManager::all_presets`] order
    pub fn get(&self, index: usize) -> Option<&Preset> {
        self.all_presets().nth(index)
    }

    pub fn len(&self) -> usize {
        self.builtin.len() + self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get preset names for display
    pub fn preset_names(&self) -> Vec<&str> {
        self.all_presets().map(|p| p.name.as_str()).collect()
    }
}
