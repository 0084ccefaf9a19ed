//! Animated particle field: bouncing points joined by fading lines whenever
//! two of them come within a configurable distance.
//!
//! [`field::ParticleField`] is the component. It draws through the
//! [`surface::Surface`] trait; [`braille::BrailleSurface`] implements that
//! trait for terminals.

pub mod braille;
pub mod color;
pub mod config;
pub mod export;
pub mod field;
pub mod presets;
pub mod settings;
pub mod surface;
