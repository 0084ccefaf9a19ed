use crate::braille::BrailleSurface;
use gif::{Encoder, Frame, Repeat};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Output pixels per surface dot
pub const EXPORT_SCALE: u32 = 4;

/// Recording stops accepting frames past this many (10 s at 60 fps)
pub const MAX_GIF_FRAMES: usize = 600;

/// GIF frame delay in hundredths of a second (~60 fps rounds to 2)
const GIF_FRAME_DELAY: u16 = 2;

/// Save the current surface as a PNG
pub fn save_png(surface: &BrailleSurface, path: &Path, scale: u32) -> Result<(), String> {
    let (width, height, bytes) = surface.to_rgba8(scale);
    if width == 0 || height == 0 {
        return Err("Nothing to export: surface has no area".to_string());
    }
    let image = image::RgbaImage::from_raw(width, height, bytes)
        .ok_or("Failed to build image buffer")?;
    image
        .save(path)
        .map_err(|e| format!("Failed to write PNG: {}", e))?;
    log::info!("saved {}x{} snapshot to {}", width, height, path.display());
    Ok(())
}

/// Streams surface frames into an animated GIF.
///
/// Frame size is fixed by the first capture; frames captured after a resize
/// are skipped.
pub struct GifRecorder {
    path: PathBuf,
    scale: u32,
    encoder: Option<Encoder<File>>,
    size: (u16, u16),
    frames: usize,
    skipped: usize,
}

impl GifRecorder {
    pub fn new(path: impl Into<PathBuf>, scale: u32) -> Self {
        Self {
            path: path.into(),
            scale: scale.max(1),
            encoder: None,
            size: (0, 0),
            frames: 0,
            skipped: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn is_full(&self) -> bool {
        self.frames >= MAX_GIF_FRAMES
    }

    /// Append the surface's current contents as a frame
    pub fn capture(&mut self, surface: &BrailleSurface) -> Result<(), String> {
        if self.is_full() {
            return Ok(());
        }
        let (width, height, mut bytes) = surface.to_rgba8(self.scale);
        let (width, height) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                self.skipped += 1;
                return Ok(());
            }
        };

        if self.encoder.is_none() {
            let file = File::create(&self.path)
                .map_err(|e| format!("Failed to create GIF file: {}", e))?;
            let mut encoder = Encoder::new(file, width, height, &[])
                .map_err(|e| format!("Failed to start GIF: {}", e))?;
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| format!("Failed to start GIF: {}", e))?;
            self.encoder = Some(encoder);
            self.size = (width, height);
            log::info!("recording {}x{} GIF to {}", width, height, self.path.display());
        }

        if (width, height) != self.size {
            self.skipped += 1;
            return Ok(());
        }

        let mut frame = Frame::from_rgba_speed(width, height, &mut bytes, 10);
        frame.delay = GIF_FRAME_DELAY;
        if let Some(encoder) = self.encoder.as_mut() {
            encoder
                .write_frame(&frame)
                .map_err(|e| format!("Failed to write GIF frame: {}", e))?;
        }
        self.frames += 1;
        Ok(())
    }

    /// Close the file. Returns the number of frames written.
    pub fn finish(self) -> Result<usize, String> {
        if self.encoder.is_none() {
            return Err("No frames were recorded".to_string());
        }
        // Dropping the encoder writes the GIF trailer
        drop(self.encoder);
        if self.skipped > 0 {
            log::warn!("{} frames skipped after the surface changed size", self.skipped);
        }
        log::info!("wrote {} frames to {}", self.frames, self.path.display());
        Ok(self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::surface::Surface;
    use tempfile::tempdir;

    fn drawn_surface(columns: u16, rows: u16) -> BrailleSurface {
        let mut surface = BrailleSurface::new(columns, rows);
        let (w, h) = surface.container_size();
        surface.set_size(w, h);
        surface.fill_circle(4.0, 4.0, 2.0, Rgba::opaque(255, 128, 0));
        surface
    }

    #[test]
    fn test_png_snapshot_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snap.png");
        save_png(&drawn_surface(8, 4), &path, 2).unwrap();

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (32, 32));
        assert_eq!(image.get_pixel(8, 8).0, [255, 128, 0, 255]);
    }

    #[test]
    fn test_png_of_empty_surface_fails() {
        let dir = tempdir().unwrap();
        let surface = BrailleSurface::new(0, 0);
        assert!(save_png(&surface, &dir.path().join("empty.png"), 2).is_err());
    }

    #[test]
    fn test_gif_recording() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("loop.gif");
        let mut recorder = GifRecorder::new(&path, 1);
        let surface = drawn_surface(8, 4);
        for _ in 0..3 {
            recorder.capture(&surface).unwrap();
        }
        assert_eq!(recorder.frame_count(), 3);
        assert_eq!(recorder.finish().unwrap(), 3);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
        assert_eq!(bytes.last(), Some(&0x3B));
    }

    #[test]
    fn test_gif_skips_resized_frames() {
        let dir = tempdir().unwrap();
        let mut recorder = GifRecorder::new(dir.path().join("mixed.gif"), 1);
        recorder.capture(&drawn_surface(8, 4)).unwrap();
        recorder.capture(&drawn_surface(10, 4)).unwrap();
        assert_eq!(recorder.frame_count(), 1);
    }

    #[test]
    fn test_finish_without_frames_fails() {
        let dir = tempdir().unwrap();
        let recorder = GifRecorder::new(dir.path().join("none.gif"), 1);
        assert!(recorder.finish().is_err());
    }
}
