//! Otsu binarization.
//!
//! The threshold level comes from [`imageproc::contrast::otsu_level`]; the
//! binarization itself is done here so the polarity can be selected - leaf
//! tissue is dark in the `L` and `a` channels but bright in `b`.

use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;

/// Which side of the Otsu level counts as foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskPolarity {
    /// Foreground pixels are brighter than the level.
    LightObjects,
    /// Foreground pixels are at or below the level.
    DarkObjects,
}

/// Binarize a grayscale image at its Otsu level.
///
/// Foreground pixels become 255, background 0.
pub fn otsu_mask(image: &GrayImage, polarity: MaskPolarity) -> GrayImage {
    let level = otsu_level(image);
    let (width, height) = image.dimensions();

    GrayImage::from_fn(width, height, |x, y| {
        let v = image.get_pixel(x, y).0[0];
        let foreground = match polarity {
            MaskPolarity::LightObjects => v > level,
            MaskPolarity::DarkObjects => v <= level,
        };
        Luma([if foreground { 255 } else { 0 }])
    })
}
