mod app;
mod ui;

use app::App;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use particle_field::braille::BrailleSurface;
use particle_field::config::FieldOptions;
use particle_field::export::{self, GifRecorder, EXPORT_SCALE};
use particle_field::field::ParticleField;
use particle_field::presets::{Preset, PresetManager};
use particle_field::settings::{FieldConfig, LineStyle};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "particle-field")]
#[command(about = "Bouncing particles linked by fading lines, in the terminal")]
struct Args {
    // === Field Parameters ===
    /// Number of particles (default 50)
    #[arg(short = 'p', long)]
    particles: Option<usize>,

    /// Pairs closer than this many dots are linked (default 100, 0 = no links)
    #[arg(short = 'd', long = "link-distance")]
    link_distance: Option<f64>,

    /// Particle radius in dots (default 2)
    #[arg(short = 'r', long)]
    radius: Option<f64>,

    /// Particle color, e.g. "rgba(255, 255, 255, 0.8)" or "#ffcc00"
    #[arg(long = "particle-color")]
    particle_color: Option<String>,

    /// Link color, e.g. "rgba(255, 255, 255, 0.3)"
    #[arg(long = "line-color")]
    line_color: Option<String>,

    /// Velocity scale (default 1)
    #[arg(short = 's', long)]
    speed: Option<f64>,

    /// Link style (solid, dotted, dashed, dash-dot)
    #[arg(long = "line-style")]
    line_style: Option<String>,

    // === Configuration Sources ===
    /// Load options from a JSON file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Start from a named preset
    #[arg(long)]
    preset: Option<String>,

    /// Write the resolved options to a JSON file and exit
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    /// Store the resolved options as a user preset with this name and exit
    #[arg(long = "save-preset")]
    save_preset: Option<String>,

    /// Remove the user preset with this name and exit
    #[arg(long = "delete-preset")]
    delete_preset: Option<String>,

    /// Append log output to this file (interactive mode never logs to the terminal)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    // === Headless Rendering ===
    /// Render offscreen instead of opening the terminal UI
    #[arg(long)]
    headless: bool,

    /// Frames to render in headless mode
    #[arg(long, default_value = "300")]
    frames: usize,

    /// Headless canvas width in terminal cells
    #[arg(long, default_value = "80")]
    cols: u16,

    /// Headless canvas height in terminal cells
    #[arg(long, default_value = "24")]
    rows: u16,

    /// Headless: record every frame to this GIF
    #[arg(long)]
    gif: Option<PathBuf>,

    /// Headless: save the last frame to this PNG
    #[arg(long)]
    png: Option<PathBuf>,
}

impl Args {
    /// Options given directly on the command line. Unparseable colors are
    /// dropped so the lower layers or the defaults apply.
    fn field_options(&self) -> FieldOptions {
        let color = |name: &str, value: &Option<String>| {
            value.as_deref().and_then(|s| match s.parse() {
                Ok(color) => Some(color),
                Err(e) => {
                    log::warn!("--{}: {}", name, e);
                    None
                }
            })
        };
        FieldOptions {
            particle_count: self.particles,
            max_link_distance: self.link_distance,
            particle_radius: self.radius,
            particle_color: color("particle-color", &self.particle_color),
            line_color: color("line-color", &self.line_color),
            speed_scale: self.speed,
            line_style: self.line_style.as_deref().map(LineStyle::parse),
        }
    }
}

fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(path) = &args.log_file {
        let file = File::options().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    } else if !args.headless {
        // Anything written to stderr would land on top of the UI
        return Ok(());
    }
    builder.init();
    Ok(())
}

/// Layer defaults < preset < config file < command line
fn resolve_options(args: &Args, presets: &PresetManager) -> Result<FieldOptions, String> {
    let mut options = FieldOptions::default();
    if let Some(name) = &args.preset {
        let preset = presets.find(name).ok_or_else(|| {
            format!(
                "Unknown preset '{}'. Available: {}",
                name,
                presets.preset_names().join(", ")
            )
        })?;
        options = options.overlay(preset.options.clone());
    }
    if let Some(path) = &args.config {
        options = options.overlay(FieldOptions::load_from_file(path)?);
    }
    Ok(options.overlay(args.field_options()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut presets = PresetManager::new();
    if let Some(name) = &args.delete_preset {
        presets.delete_preset(name)?;
        println!("Deleted preset '{}'", name);
        return Ok(());
    }
    let options = resolve_options(&args, &presets)?;

    if let Some(path) = &args.save_config {
        options.save_to_file(path)?;
        println!("Saved options to {}", path.display());
        return Ok(());
    }
    if let Some(name) = &args.save_preset {
        presets.save_preset(Preset::new(name.clone(), "Saved from the command line", options))?;
        println!("Saved preset '{}'", name);
        return Ok(());
    }

    let config = FieldConfig::from(&options);
    if args.headless {
        return run_headless(&args, config).map_err(Into::into);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Get initial terminal size and create app
    let size = terminal.size()?;
    let frame_rect = ratatui::layout::Rect {
        x: 0,
        y: 0,
        width: size.width,
        height: size.height,
    };
    let (canvas_width, canvas_height) = ui::get_canvas_size(frame_rect, false);
    let mut app = App::new(canvas_width, canvas_height, config, presets);
    app.field.start();

    // Run the app
    let res = run_app(&mut terminal, &mut app);
    app.shutdown();

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }
    if let Some(message) = &app.status_message {
        println!("{}", message);
    }

    Ok(())
}

/// Render frames offscreen and write the requested PNG/GIF
fn run_headless(args: &Args, config: FieldConfig) -> Result<(), String> {
    if args.gif.is_none() && args.png.is_none() {
        return Err("Headless mode needs --gif and/or --png".to_string());
    }

    let mut field = ParticleField::new(BrailleSurface::new(args.cols, args.rows), config);
    let mut recorder = args.gif.as_ref().map(|path| GifRecorder::new(path, EXPORT_SCALE / 2));

    field.start();
    for _ in 0..args.frames.max(1) {
        if let Some(recorder) = recorder.as_mut() {
            recorder.capture(field.surface())?;
        }
        field.animate();
    }

    if let Some(recorder) = recorder {
        recorder.finish()?;
    }
    if let Some(path) = &args.png {
        export::save_png(field.surface(), path, EXPORT_SCALE)?;
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_running(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
                        KeyCode::Char('l') | KeyCode::Char('L') => app.cycle_line_style(),
                        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_particles(10),
                        KeyCode::Char('-') | KeyCode::Char('_') => app.adjust_particles(-10),
                        KeyCode::Char(']') => app.adjust_link_distance(10.0),
                        KeyCode::Char('[') => app.adjust_link_distance(-10.0),
                        KeyCode::Char('p') | KeyCode::Char('P') => app.next_preset(),
                        KeyCode::Char('s') | KeyCode::Char('S') => app.snapshot(),
                        KeyCode::Char('g') | KeyCode::Char('G') => app.toggle_recording(),
                        KeyCode::Char('v') | KeyCode::Char('V') => {
                            app.toggle_fullscreen();
                            let size = terminal.size()?;
                            let (w, h) = ui::get_canvas_size(
                                ratatui::layout::Rect::new(0, 0, size.width, size.height),
                                app.fullscreen_mode,
                            );
                            app.resize(w, h);
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                            app.toggle_help()
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Resize(width, height) => {
                    let (canvas_width, canvas_height) = ui::get_canvas_size(
                        ratatui::layout::Rect {
                            x: 0,
                            y: 0,
                            width,
                            height,
                        },
                        app.fullscreen_mode,
                    );
                    app.resize(canvas_width, canvas_height);
                }
                _ => {}
            }
        }

        // Run one frame cycle
        app.tick();
    }
}
