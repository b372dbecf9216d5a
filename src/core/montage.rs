//! # Montage
//!
//! Composites a variant set into a single grid image - the single-image
//! "display" surface. Cells are sized to the largest variant; unfilled
//! space stays white.

use crate::core::variants::VariantSet;
use image::imageops;
use image::{Rgb, RgbImage};

const CELL_PADDING: u32 = 8;

/// Compose all variants into one left-to-right, top-to-bottom grid.
///
/// Returns `None` for an empty set.
pub fn compose_grid(variants: &VariantSet, max_cols: usize) -> Option<RgbImage> {
    if variants.is_empty() {
        return None;
    }

    let cells: Vec<RgbImage> = variants.iter().map(|(_, img)| img.to_rgb8()).collect();

    let cell_w = cells.iter().map(|c| c.width()).max()?;
    let cell_h = cells.iter().map(|c| c.height()).max()?;

    let cols = max_cols.clamp(1, cells.len()) as u32;
    let rows = (cells.len() as u32).div_ceil(cols);

    let canvas_w = cols * (cell_w + CELL_PADDING) + CELL_PADDING;
    let canvas_h = rows * (cell_h + CELL_PADDING) + CELL_PADDING;
    let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, Rgb([255, 255, 255]));

    for (i, cell) in cells.iter().enumerate() {
        let col = i as u32 % cols;
        let row = i as u32 / cols;
        let x = CELL_PADDING + col * (cell_w + CELL_PADDING);
        let y = CELL_PADDING + row * (cell_h + CELL_PADDING);
        imageops::overlay(&mut canvas, cell, i64::from(x), i64::from(y));
    }

    Some(canvas)
}
