use crate::settings::FieldConfig;
use crate::surface::Surface;
use rand::rngs::ThreadRng;
use rand::Rng;

/// A moving point with a fixed visual radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

/// Bouncing particles linked by faint lines when close to each other.
///
/// The field owns its surface, its configuration snapshot and its particles.
/// A host drives it by calling [`ParticleField::animate`] once per display
/// refresh and [`ParticleField::resize`] whenever the container changes size.
/// Everything runs on the host's thread; the field is never shared.
pub struct ParticleField<S: Surface> {
    surface: S,
    config: FieldConfig,
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    running: bool,
    links_drawn: usize,
    rng: ThreadRng,
}

impl<S: Surface> ParticleField<S> {
    /// Bind to a surface, size it to its container and seed the particles.
    /// The field starts stopped.
    pub fn new(surface: S, config: FieldConfig) -> Self {
        let mut field = Self {
            surface,
            config,
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            running: false,
            links_drawn: 0,
            rng: rand::thread_rng(),
        };
        field.resize();
        field.seed();
        log::info!(
            "particle field {}x{} seeded with {} particles",
            field.width,
            field.height,
            field.particles.len()
        );
        field
    }

    /// Copy the container's current size onto the surface.
    /// Particles keep their positions, even if now out of bounds.
    pub fn resize(&mut self) {
        let (width, height) = self.surface.container_size();
        self.surface.set_size(width, height);
        self.width = width as f64;
        self.height = height as f64;
        log::debug!("particle field resized to {}x{}", width, height);
    }

    /// Replace every particle with a freshly randomized one
    pub fn seed(&mut self) {
        let speed = self.config.speed_scale;
        let radius = self.config.particle_radius;
        let (width, height) = (self.width, self.height);
        let rng = &mut self.rng;

        self.particles = (0..self.config.particle_count)
            .map(|_| Particle {
                x: rng.gen::<f64>() * width,
                y: rng.gen::<f64>() * height,
                vx: (rng.gen::<f64>() - 0.5) * speed,
                vy: (rng.gen::<f64>() - 0.5) * speed,
                radius,
            })
            .collect();
    }

    /// Move every particle one step and reverse velocity on any axis that is
    /// outside the surface. Positions are not clamped.
    pub fn advance(&mut self) {
        let (width, height) = (self.width, self.height);

        for particle in &mut self.particles {
            particle.x += particle.vx;
            particle.y += particle.vy;

            if particle.x < 0.0 || particle.x > width {
                particle.vx = -particle.vx;
            }
            if particle.y < 0.0 || particle.y > height {
                particle.vy = -particle.vy;
            }
        }
    }

    /// Clear the surface, draw every particle, then link every pair closer
    /// than the link distance with a line that thins out as the pair separates.
    pub fn render(&mut self) {
        let surface = &mut self.surface;
        let config = &self.config;

        surface.clear_rect(0.0, 0.0, self.width, self.height);

        for particle in &self.particles {
            surface.fill_circle(particle.x, particle.y, particle.radius, config.particle_color);
        }

        surface.set_line_dash(config.line_style.dash_pattern());

        let max_distance = config.max_link_distance;
        let mut links = 0;
        if max_distance > 0.0 {
            for (i, p1) in self.particles.iter().enumerate() {
                for p2 in &self.particles[i + 1..] {
                    let distance = ((p1.x - p2.x).powi(2) + (p1.y - p2.y).powi(2)).sqrt();
                    if distance < max_distance {
                        surface.stroke_line(
                            (p1.x, p1.y),
                            (p2.x, p2.y),
                            1.0 - distance / max_distance,
                            config.line_color,
                        );
                        links += 1;
                    }
                }
            }
        }

        // Leave the surface solid for anyone else drawing on it
        surface.set_line_dash(&[]);
        self.links_drawn = links;
    }

    /// One frame cycle. Returns whether the host should schedule another.
    pub fn animate(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.advance();
        self.render();
        true
    }

    /// Begin animating and run the first frame right away.
    /// Does nothing if already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        log::debug!("particle field started");
        self.animate();
    }

    /// Stop after the current frame. Particles and the surface are left as is.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("particle field stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to particle state; the particle count cannot change
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Surface dimensions used for seeding and bouncing
    pub fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Number of links drawn by the last render
    pub fn link_count(&self) -> usize {
        self.links_drawn
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::settings::LineStyle;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn field_with(count: usize, max_link_distance: f64) -> ParticleField<RecordingSurface> {
        let config = FieldConfig {
            particle_count: count,
            max_link_distance,
            ..FieldConfig::default()
        };
        ParticleField::new(RecordingSurface::new(400, 300), config)
    }

    fn place(field: &mut ParticleField<RecordingSurface>, positions: &[(f64, f64)]) {
        for (particle, &(x, y)) in field.particles_mut().iter_mut().zip(positions) {
            particle.x = x;
            particle.y = y;
        }
    }

    #[test]
    fn test_construction_sizes_surface_to_container() {
        let field = field_with(5, 100.0);
        assert_eq!(field.dimensions(), (400.0, 300.0));
        assert_eq!(field.surface().size, (400, 300));
        assert!(!field.is_running());
    }

    #[test]
    fn test_seed_produces_configured_count_within_bounds() {
        let config = FieldConfig {
            particle_count: 200,
            speed_scale: 3.0,
            particle_radius: 4.5,
            ..FieldConfig::default()
        };
        let mut field = ParticleField::new(RecordingSurface::new(640, 480), config);

        for _ in 0..3 {
            field.seed();
            assert_eq!(field.particles().len(), 200);
            for p in field.particles() {
                assert!(p.x >= 0.0 && p.x < 640.0);
                assert!(p.y >= 0.0 && p.y < 480.0);
                assert!(p.vx >= -1.5 && p.vx < 1.5);
                assert!(p.vy >= -1.5 && p.vy < 1.5);
                assert_eq!(p.radius, 4.5);
            }
        }
    }

    #[test]
    fn test_seed_with_zero_sized_container() {
        let field = ParticleField::new(RecordingSurface::new(0, 0), FieldConfig::default());
        assert_eq!(field.particles().len(), 50);
        assert!(field.particles().iter().all(|p| p.x == 0.0 && p.y == 0.0));
    }

    #[test]
    fn test_advance_is_deterministic() {
        let mut a = field_with(30, 100.0);
        let mut b = field_with(30, 100.0);
        b.particles_mut().copy_from_slice(a.particles());

        a.advance();
        b.advance();
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_advance_is_explicit_euler() {
        let mut field = field_with(1, 100.0);
        field.particles_mut()[0] = Particle {
            x: 10.0,
            y: 20.0,
            vx: 0.25,
            vy: -0.5,
            radius: 2.0,
        };
        field.advance();
        let p = field.particles()[0];
        assert_eq!((p.x, p.y), (10.25, 19.5));
        assert_eq!((p.vx, p.vy), (0.25, -0.5));
    }

    #[test]
    fn test_wall_bounce_reverses_without_clamping() {
        let mut field = field_with(1, 100.0);
        field.particles_mut()[0] = Particle {
            x: 401.0,
            y: 150.0,
            vx: 0.4,
            vy: 0.1,
            radius: 2.0,
        };
        field.advance();
        let p = field.particles()[0];
        assert_eq!(p.vx, -0.4);
        assert_eq!(p.vy, 0.1);
        assert_eq!(p.radius, 2.0);
        assert!((p.x - 401.4).abs() < 1e-9);
    }

    #[test]
    fn test_overshoot_returns_next_frame() {
        let mut field = field_with(1, 100.0);
        field.particles_mut()[0] = Particle {
            x: 399.9,
            y: 150.0,
            vx: 0.4,
            vy: 0.0,
            radius: 2.0,
        };
        field.advance();
        assert!(field.particles()[0].x > 400.0);
        assert_eq!(field.particles()[0].vx, -0.4);

        field.advance();
        let p = field.particles()[0];
        assert!((p.x - 399.9).abs() < 1e-9);
        assert_eq!(p.vx, -0.4);
    }

    #[test]
    fn test_bounce_on_top_edge() {
        let mut field = field_with(1, 100.0);
        field.particles_mut()[0] = Particle {
            x: 50.0,
            y: 0.2,
            vx: 0.0,
            vy: -0.5,
            radius: 2.0,
        };
        field.advance();
        assert_eq!(field.particles()[0].vy, 0.5);
        assert_eq!(field.particles()[0].vx, 0.0);
    }

    #[test]
    fn test_two_close_particles_draw_one_line() {
        let mut field = field_with(2, 50.0);
        place(&mut field, &[(0.0, 0.0), (10.0, 0.0)]);

        field.render();
        let surface = field.surface();
        assert_eq!(surface.circles(), 2);
        let widths = surface.line_widths();
        assert_eq!(widths.len(), 1);
        assert!((widths[0] - 0.8).abs() < 1e-9);
        assert_eq!(field.link_count(), 1);
    }

    #[test]
    fn test_far_particles_draw_no_lines() {
        let mut field = field_with(3, 100.0);
        place(&mut field, &[(0.0, 0.0), (200.0, 0.0), (0.0, 250.0)]);

        field.render();
        assert_eq!(field.surface().circles(), 3);
        assert!(field.surface().line_widths().is_empty());
    }

    #[test]
    fn test_link_threshold_is_strict() {
        let mut field = field_with(2, 50.0);
        place(&mut field, &[(0.0, 0.0), (50.0, 0.0)]);
        field.render();
        assert!(field.surface().line_widths().is_empty());

        field.surface_mut().commands.clear();
        place(&mut field, &[(0.0, 0.0), (49.999, 0.0)]);
        field.render();
        let widths = field.surface().line_widths();
        assert_eq!(widths.len(), 1);
        assert!(widths[0] > 0.0 && widths[0] < 0.001);
    }

    #[test]
    fn test_coincident_particles_get_full_width() {
        let mut field = field_with(2, 50.0);
        place(&mut field, &[(30.0, 30.0), (30.0, 30.0)]);
        field.render();
        assert_eq!(field.surface().line_widths(), vec![1.0]);
    }

    #[test]
    fn test_zero_link_distance_never_links() {
        let mut field = field_with(2, 0.0);
        place(&mut field, &[(5.0, 5.0), (5.0, 5.0)]);
        field.render();
        assert!(field.surface().line_widths().is_empty());
        assert_eq!(field.link_count(), 0);
    }

    #[test]
    fn test_render_without_particles_only_clears() {
        let mut field = field_with(0, 100.0);
        field.render();
        let commands = &field.surface().commands;
        assert_eq!(
            commands[0],
            DrawCommand::ClearRect {
                x: 0.0,
                y: 0.0,
                width: 400.0,
                height: 300.0
            }
        );
        assert_eq!(field.surface().circles(), 0);
        assert!(field.surface().line_widths().is_empty());
    }

    #[test]
    fn test_render_sets_then_resets_dash_pattern() {
        let config = FieldConfig {
            particle_count: 2,
            line_style: LineStyle::DashDot,
            line_color: Rgba::opaque(0, 255, 0),
            ..FieldConfig::default()
        };
        let mut field = ParticleField::new(RecordingSurface::new(100, 100), config);
        place(&mut field, &[(10.0, 10.0), (20.0, 10.0)]);
        field.render();

        let commands = &field.surface().commands;
        let dashes: Vec<&Vec<f64>> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetLineDash(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(dashes, vec![&vec![10.0, 5.0, 2.0, 5.0], &vec![]]);
        assert_eq!(commands.last(), Some(&DrawCommand::SetLineDash(vec![])));

        let line = commands
            .iter()
            .find(|c| matches!(c, DrawCommand::StrokeLine { .. }))
            .unwrap();
        match line {
            DrawCommand::StrokeLine { from, to, color, .. } => {
                assert_eq!(*from, (10.0, 10.0));
                assert_eq!(*to, (20.0, 10.0));
                assert_eq!(*color, Rgba::opaque(0, 255, 0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_pairs_are_enumerated_once() {
        let mut field = field_with(4, 100.0);
        place(&mut field, &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        field.render();
        assert_eq!(field.surface().line_widths().len(), 6);
    }

    #[test]
    fn test_animate_only_while_running() {
        let mut field = field_with(3, 100.0);
        assert!(!field.animate());
        assert!(field.surface().commands.is_empty());

        field.start();
        assert!(field.is_running());
        assert!(field.animate());

        field.stop();
        assert!(!field.animate());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut field = field_with(3, 100.0);
        field.start();
        let after_first = field.surface().commands.len();
        field.start();
        assert_eq!(field.surface().commands.len(), after_first);
        assert!(field.is_running());

        field.stop();
        field.stop();
        assert!(!field.is_running());
    }

    #[test]
    fn test_restart_resumes_without_reseeding() {
        let mut field = field_with(10, 100.0);
        for (i, p) in field.particles_mut().iter_mut().enumerate() {
            p.x = 100.0 + i as f64;
            p.y = 100.0;
            p.vx = 1.0;
            p.vy = 0.5;
        }
        let seeded: Vec<Particle> = field.particles().to_vec();

        field.start();
        field.animate();
        field.stop();
        let stopped: Vec<Particle> = field.particles().to_vec();
        field.animate();
        assert_eq!(field.particles(), stopped.as_slice());

        field.start();
        assert_eq!(field.particles().len(), 10);
        for (now, then) in field.particles().iter().zip(&seeded) {
            assert!((now.x - (then.x + 3.0)).abs() < 1e-9);
            assert!((now.y - (then.y + 1.5)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut field = field_with(20, 100.0);
        let before: Vec<Particle> = field.particles().to_vec();

        field.surface_mut().container = (120, 80);
        field.resize();

        assert_eq!(field.dimensions(), (120.0, 80.0));
        assert_eq!(field.surface().size, (120, 80));
        assert_eq!(field.particles(), before.as_slice());
    }

    #[test]
    fn test_shrink_pulls_particle_back() {
        let mut field = field_with(1, 100.0);
        field.particles_mut()[0] = Particle {
            x: 390.0,
            y: 10.0,
            vx: 0.5,
            vy: 0.0,
            radius: 2.0,
        };
        field.surface_mut().container = (100, 100);
        field.resize();

        field.advance();
        assert_eq!(field.particles()[0].vx, -0.5);
    }

    #[test]
    fn test_render_tolerates_odd_configuration() {
        let config = FieldConfig {
            particle_count: 5,
            particle_radius: -3.0,
            speed_scale: -2.0,
            ..FieldConfig::default()
        };
        let mut field = ParticleField::new(RecordingSurface::new(50, 50), config);
        field.start();
        for _ in 0..10 {
            field.animate();
        }
        assert_eq!(field.particles().len(), 5);
    }
}
