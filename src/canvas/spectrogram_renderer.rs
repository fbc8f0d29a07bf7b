use crate::canvas::colors::Colormap;
use crate::types::NormalizedGrid;
use image::{Rgb, RgbImage};

/// Render a normalized grid to an RGB raster through a colormap.
/// Width = number of frames, height = number of mel bands.
/// Row 0 is the lowest mel band; the grid is not flipped.
pub fn colorize(grid: &NormalizedGrid, colormap: &Colormap) -> RgbImage {
    let width = grid.n_frames as u32;
    let height = grid.n_mels as u32;
    RgbImage::from_fn(width, height, |x, y| {
        Rgb(colormap.apply(grid.get(y as usize, x as usize)))
    })
}
