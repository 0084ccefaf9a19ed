use crate::color::Rgba;

/// A 2D drawing surface a particle field renders into.
///
/// Sizes are in pixels. The container is whatever the surface is embedded in;
/// the field copies its size onto the surface on every resize.
pub trait Surface {
    /// Current content size of the enclosing container
    fn container_size(&self) -> (u32, u32);

    /// Current pixel size of the surface
    fn size(&self) -> (u32, u32);

    /// Set the pixel size of the surface
    fn set_size(&mut self, width: u32, height: u32);

    /// Clear a rectangle to transparent
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Fill a circle centered on (x, y)
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba);

    /// Dash pattern used by subsequent strokes; empty is solid
    fn set_line_dash(&mut self, pattern: &[f64]);

    /// Stroke a straight line
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgba);
}

/// Draw command captured by [`RecordingSurface`]
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    FillCircle {
        x: f64,
        y: f64,
        radius: f64,
        color: Rgba,
    },
    SetLineDash(Vec<f64>),
    StrokeLine {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Rgba,
    },
}

/// Surface that records every call, for asserting on what a field draws
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub container: (u32, u32),
    pub size: (u32, u32),
    pub commands: Vec<DrawCommand>,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            container: (width, height),
            ..Default::default()
        }
    }

    pub fn circles(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count()
    }

    /// Widths of every stroked line, in draw order
    pub fn line_widths(&self) -> Vec<f64> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokeLine { width, .. } => Some(*width),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn container_size(&self) -> (u32, u32) {
        self.container
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect { x, y, width, height });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle { x, y, radius, color });
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.commands.push(DrawCommand::SetLineDash(pattern.to_vec()));
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgba) {
        self.commands.push(DrawCommand::StrokeLine { from, to, width, color });
    }
}
