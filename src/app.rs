use particle_field::braille::BrailleSurface;
use particle_field::export::{self, GifRecorder, EXPORT_SCALE};
use particle_field::field::ParticleField;
use particle_field::presets::PresetManager;
use particle_field::settings::FieldConfig;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Main application state
pub struct App {
    pub field: ParticleField<BrailleSurface>,
    pub presets: PresetManager,
    /// Index of the last preset applied with the preset key
    pub preset_index: Option<usize>,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    /// Last export/preset message shown in the status box
    pub status_message: Option<String>,
    recorder: Option<GifRecorder>,
}

impl App {
    pub fn new(canvas_width: u16, canvas_height: u16, config: FieldConfig, presets: PresetManager) -> Self {
        Self {
            field: ParticleField::new(BrailleSurface::new(canvas_width, canvas_height), config),
            presets,
            preset_index: None,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            status_message: None,
            recorder: None,
        }
    }

    /// Run one frame of the field and feed the recorder
    pub fn tick(&mut self) {
        if !self.field.animate() {
            return;
        }
        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(e) = recorder.capture(self.field.surface()) {
                log::error!("{}", e);
                self.status_message = Some(e);
                self.recorder = None;
            } else if recorder.is_full() {
                self.stop_recording();
            }
        }
    }

    /// Start or stop the animation
    pub fn toggle_running(&mut self) {
        if self.field.is_running() {
            self.field.stop();
        } else {
            self.field.start();
        }
    }

    /// Replace the field with a freshly seeded one using `config`.
    /// The running state carries over.
    pub fn rebuild(&mut self, config: FieldConfig) {
        let was_running = self.field.is_running();
        let (columns, rows) = self.field.surface().container_cells();
        self.field = ParticleField::new(BrailleSurface::new(columns, rows), config);
        if was_running {
            self.field.start();
        } else {
            self.field.render();
        }
    }

    /// Full restart with the current configuration
    pub fn reset(&mut self) {
        self.rebuild(*self.field.config());
    }

    pub fn cycle_line_style(&mut self) {
        let config = *self.field.config();
        self.rebuild(config.with_line_style(config.line_style.next()));
    }

    pub fn adjust_particles(&mut self, delta: i64) {
        self.rebuild(self.field.config().with_particle_delta(delta));
    }

    pub fn adjust_link_distance(&mut self, delta: f64) {
        self.rebuild(self.field.config().with_link_delta(delta));
    }

    /// Apply the next preset in the list
    pub fn next_preset(&mut self) {
        if self.presets.is_empty() {
            return;
        }
        let index = self.preset_index.map_or(0, |i| (i + 1) % self.presets.len());
        if let Some(preset) = self.presets.get(index) {
            let config = FieldConfig::from(&preset.options);
            self.status_message = Some(format!("Preset: {}", preset.name));
            self.preset_index = Some(index);
            self.rebuild(config);
        }
    }

    /// Resize the field to match a new canvas size
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        self.field.surface_mut().set_container(canvas_width, canvas_height);
        self.field.resize();
        if !self.field.is_running() {
            self.field.render();
        }
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Write the current frame to a timestamped PNG
    pub fn snapshot(&mut self) {
        let path = timestamped("particle-field", "png");
        self.status_message = Some(
            match export::save_png(self.field.surface(), &path, EXPORT_SCALE) {
                Ok(()) => format!("Saved {}", path.display()),
                Err(e) => e,
            },
        );
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Start or finish recording a GIF
    pub fn toggle_recording(&mut self) {
        if self.recorder.is_some() {
            self.stop_recording();
        } else {
            let path = timestamped("particle-field", "gif");
            self.status_message = Some(format!("Recording {}", path.display()));
            self.recorder = Some(GifRecorder::new(path, EXPORT_SCALE / 2));
        }
    }

    fn stop_recording(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let path = recorder.path().to_path_buf();
            self.status_message = Some(match recorder.finish() {
                Ok(frames) => format!("Saved {} frames to {}", frames, path.display()),
                Err(e) => e,
            });
        }
    }

    /// Flush any recording in progress before exit
    pub fn shutdown(&mut self) {
        self.stop_recording();
    }
}

/// `<prefix>-<unix seconds>.<extension>` in the working directory
fn timestamped(prefix: &str, extension: &str) -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    PathBuf::from(format!("{}-{}.{}", prefix, secs, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use particle_field::settings::LineStyle;

    fn app() -> App {
        let config = FieldConfig {
            particle_count: 12,
            ..FieldConfig::default()
        };
        App::new(40, 10, config, PresetManager::with_dir(None))
    }

    #[test]
    fn test_toggle_running() {
        let mut app = app();
        assert!(!app.field.is_running());
        app.toggle_running();
        assert!(app.field.is_running());
        app.toggle_running();
        assert!(!app.field.is_running());
    }

    #[test]
    fn test_rebuild_keeps_running_state_and_container() {
        let mut app = app();
        app.toggle_running();
        app.adjust_particles(8);

        assert!(app.field.is_running());
        assert_eq!(app.field.particles().len(), 20);
        assert_eq!(app.field.dimensions(), (80.0, 40.0));
    }

    #[test]
    fn test_cycle_line_style_changes_config_only() {
        let mut app = app();
        app.cycle_line_style();
        assert_eq!(app.field.config().line_style, LineStyle::Dotted);
        assert_eq!(app.field.config().particle_count, 12);
    }

    #[test]
    fn test_link_distance_floor() {
        let mut app = app();
        app.adjust_link_distance(-1000.0);
        assert_eq!(app.field.config().max_link_distance, 0.0);
    }

    #[test]
    fn test_resize_updates_dimensions_only() {
        let mut app = app();
        let before = app.field.particles().to_vec();
        app.resize(20, 5);
        assert_eq!(app.field.dimensions(), (40.0, 20.0));
        assert_eq!(app.field.particles(), before.as_slice());
    }

    fn has_drawn_pixels(app: &App) -> bool {
        let (_, _, bytes) = app.field.surface().to_rgba8(1);
        bytes.chunks(4).any(|px| px[..3].iter().any(|&c| c > 0))
    }

    #[test]
    fn test_paused_field_redraws_after_rebuild() {
        let mut app = app();
        assert!(!has_drawn_pixels(&app));
        app.cycle_line_style();
        assert!(!app.field.is_running());
        assert!(has_drawn_pixels(&app));
    }

    #[test]
    fn test_paused_field_redraws_after_resize() {
        let mut app = app();
        let before = app.field.particles().to_vec();
        app.resize(60, 20);
        assert!(!app.field.is_running());
        assert!(has_drawn_pixels(&app));
        assert_eq!(app.field.particles(), before.as_slice());
    }

    #[test]
    fn test_tick_advances_only_when_running() {
        let mut app = app();
        let before = app.field.particles().to_vec();
        app.tick();
        assert_eq!(app.field.particles(), before.as_slice());
    }

    #[test]
    fn test_next_preset_wraps() {
        let mut app = app();
        let count = app.presets.len();
        for _ in 0..count {
            app.next_preset();
        }
        assert_eq!(app.preset_index, Some(count - 1));
        app.next_preset();
        assert_eq!(app.preset_index, Some(0));
        assert_eq!(*app.field.config(), FieldConfig::default());
    }
}
