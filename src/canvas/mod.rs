//! False-color rendering and spatial resizing.

pub mod colors;
pub mod resize;
pub mod spectrogram_renderer;

use crate::types::NormalizedGrid;
use image::RgbImage;

/// Colorize with viridis, then resize to `width` x `height`.
pub fn render_image(grid: &NormalizedGrid, width: u32, height: u32) -> RgbImage {
    let colored = spectrogram_renderer::colorize(grid, colors::viridis());
    resize::resize_bilinear(&colored, width, height)
}
