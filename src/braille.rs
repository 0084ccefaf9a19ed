use crate::color::Rgba;
use crate::surface::Surface;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

pub const DOTS_PER_CELL_X: u32 = 2;
pub const DOTS_PER_CELL_Y: u32 = 4;

/// Dots with less accumulated alpha than this stay blank
const DOT_THRESHOLD: f32 = 0.04;

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Drawing surface backed by a dot raster, one pixel per Braille dot.
///
/// Pixels hold premultiplied RGBA fractions composited source-over, so
/// faint strokes build up where they overlap.
pub struct BrailleSurface {
    columns: u16,
    rows: u16,
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
    dash: Vec<f64>,
}

impl BrailleSurface {
    /// Surface inside a container of `columns` x `rows` terminal cells.
    /// The raster stays empty until the owner sizes it.
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            width: 0,
            height: 0,
            pixels: Vec::new(),
            dash: Vec::new(),
        }
    }

    /// Record a new container size in cells; call the field's resize afterwards
    pub fn set_container(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
    }

    pub fn container_cells(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Premultiplied pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let [r, g, b, a] = color.premultiplied();
        let c = coverage.clamp(0.0, 1.0);
        let src = [r * c, g * c, b * c, a * c];
        let i = self.index(x as u32, y as u32);
        let dst = &mut self.pixels[i];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = s + *d * (1.0 - src[3]);
        }
    }

    /// Render the raster to Braille characters, one per terminal cell
    pub fn cells(&self) -> Vec<BrailleCell> {
        let columns = self.width.div_ceil(DOTS_PER_CELL_X);
        let rows = self.height.div_ceil(DOTS_PER_CELL_Y);
        let mut cells = Vec::new();

        for cy in 0..rows {
            for cx in 0..columns {
                let mut pattern: u8 = 0;
                let mut total = [0.0f32; 3];
                let mut dot_count = 0;

                for dx in 0..2 {
                    for dy in 0..4 {
                        let px = cx * DOTS_PER_CELL_X + dx as u32;
                        let py = cy * DOTS_PER_CELL_Y + dy as u32;
                        if let Some([r, g, b, a]) = self.pixel(px, py) {
                            if a >= DOT_THRESHOLD {
                                pattern |= BRAILLE_DOTS[dx][dy];
                                total[0] += r;
                                total[1] += g;
                                total[2] += b;
                                dot_count += 1;
                            }
                        }
                    }
                }

                // Only emit cells that have at least one dot
                if pattern != 0 {
                    let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                    let channel = |v: f32| (v / dot_count as f32 * 255.0).round().clamp(0.0, 255.0) as u8;
                    cells.push(BrailleCell {
                        x: cx as u16,
                        y: cy as u16,
                        char: braille_char,
                        color: Color::Rgb(channel(total[0]), channel(total[1]), channel(total[2])),
                    });
                }
            }
        }

        cells
    }

    /// Opaque RGBA8 image of the raster over black, each dot scaled to a
    /// `scale` x `scale` block. Returns (width, height, bytes).
    pub fn to_rgba8(&self, scale: u32) -> (u32, u32, Vec<u8>) {
        let scale = scale.max(1);
        let out_width = self.width.saturating_mul(scale);
        let out_height = self.height.saturating_mul(scale);
        let mut bytes = Vec::with_capacity(out_width as usize * out_height as usize * 4);

        for oy in 0..out_height {
            for ox in 0..out_width {
                let [r, g, b, _] = self.pixels[self.index(ox / scale, oy / scale)];
                let channel = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
                bytes.extend_from_slice(&[channel(r), channel(g), channel(b), 255]);
            }
        }

        (out_width, out_height, bytes)
    }
}

/// Whether the stroke is "on" at `distance` along a dashed line.
/// Odd-length patterns repeat twice, as on an HTML canvas.
fn dash_on(pattern: &[f64], distance: f64) -> bool {
    let total: f64 = pattern.iter().sum();
    if pattern.is_empty() || total <= 0.0 {
        return true;
    }
    let period = if pattern.len() % 2 == 1 { total * 2.0 } else { total };
    let mut pos = distance.rem_euclid(period);

    for (i, len) in pattern.iter().cycle().take(pattern.len() * 2).enumerate() {
        if pos < *len {
            return i % 2 == 0;
        }
        pos -= len;
    }
    true
}

impl Surface for BrailleSurface {
    fn container_size(&self) -> (u32, u32) {
        (
            self.columns as u32 * DOTS_PER_CELL_X,
            self.rows as u32 * DOTS_PER_CELL_Y,
        )
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        // Resizing clears the raster, like a canvas
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 4]; width as usize * height as usize];
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let x0 = x.max(0.0).floor() as u32;
        let y0 = y.max(0.0).floor() as u32;
        let x1 = ((x + width).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((y + height).ceil().max(0.0) as u32).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                let i = self.index(px, py);
                self.pixels[i] = [0.0; 4];
            }
        }
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        if !(radius > 0.0) || !x.is_finite() || !y.is_finite() {
            return;
        }
        let x0 = (x - radius - 1.0).floor() as i64;
        let x1 = (x + radius + 1.0).ceil() as i64;
        let y0 = (y - radius - 1.0).floor() as i64;
        let y1 = (y + radius + 1.0).ceil() as i64;

        for py in y0.max(0)..=y1.min(self.height as i64 - 1) {
            for px in x0.max(0)..=x1.min(self.width as i64 - 1) {
                let dx = px as f64 + 0.5 - x;
                let dy = py as f64 + 0.5 - y;
                let coverage = radius + 0.5 - (dx * dx + dy * dy).sqrt();
                if coverage > 0.0 {
                    self.blend(px, py, color, coverage as f32);
                }
            }
        }
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        // Invalid patterns are ignored, as on a canvas
        if pattern.iter().all(|v| v.is_finite() && *v >= 0.0) {
            self.dash = pattern.to_vec();
        }
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgba) {
        if !(width > 0.0) || ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
            return;
        }
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let length = (dx * dx + dy * dy).sqrt();
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        let coverage = width.min(1.0) as f32;
        let mut last = None;

        for i in 0..=steps {
            let (i, n) = (i as f64, steps as f64);
            if !dash_on(&self.dash, length * i / n) {
                continue;
            }
            let px = (from.0 + dx * i / n).floor() as i64;
            let py = (from.1 + dy * i / n).floor() as i64;
            if last == Some((px, py)) {
                continue;
            }
            last = Some((px, py));
            self.blend(px, py, color, coverage);
        }
    }
}
