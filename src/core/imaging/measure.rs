//! Geometric mask measurements and analysis overlays.

use crate::core::context::ShapeMeasurements;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

/// Outline color for analysis overlays.
const OUTLINE: Rgb<u8> = Rgb([255, 0, 255]);
/// Bounding box color for analysis overlays.
const BOUNDS: Rgb<u8> = Rgb([0, 160, 255]);

/// True when a foreground pixel touches background (4-neighborhood) or the
/// image border.
fn is_boundary(mask: &GrayImage, x: u32, y: u32) -> bool {
    if mask.get_pixel(x, y).0[0] == 0 {
        return false;
    }
    let (width, height) = mask.dimensions();
    if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
        return true;
    }
    mask.get_pixel(x - 1, y).0[0] == 0
        || mask.get_pixel(x + 1, y).0[0] == 0
        || mask.get_pixel(x, y - 1).0[0] == 0
        || mask.get_pixel(x, y + 1).0[0] == 0
}

/// Measure a binary mask: area, perimeter, bounding box and centroid.
///
/// An empty mask yields all-zero measurements rather than an error - the
/// caller decides whether that is fatal.
pub fn measure_mask(mask: &GrayImage) -> ShapeMeasurements {
    let mut area = 0u64;
    let mut perimeter = 0u64;
    let mut sum_x = 0u64;
    let mut sum_y = 0u64;
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        area += 1;
        sum_x += u64::from(x);
        sum_y += u64::from(y);
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
        if is_boundary(mask, x, y) {
            perimeter += 1;
        }
    }

    if area == 0 {
        return ShapeMeasurements::default();
    }

    ShapeMeasurements {
        area: area as f64,
        perimeter: perimeter as f64,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
        centroid_x: sum_x as f64 / area as f64,
        centroid_y: sum_y as f64 / area as f64,
    }
}

/// Draw the mask outline and bounding box over a copy of the image.
pub fn outline_overlay(
    image: &RgbImage,
    mask: &GrayImage,
    measurements: &ShapeMeasurements,
) -> RgbImage {
    let mut overlay = image.clone();
    let (width, height) = overlay.dimensions();

    for y in 0..height.min(mask.height()) {
        for x in 0..width.min(mask.width()) {
            if is_boundary(mask, x, y) {
                overlay.put_pixel(x, y, OUTLINE);
            }
        }
    }

    if measurements.width > 0 && measurements.height > 0 {
        let x0 = (measurements.centroid_x - f64::from(measurements.width) / 2.0).max(0.0) as i32;
        let y0 = (measurements.centroid_y - f64::from(measurements.height) / 2.0).max(0.0) as i32;
        draw_hollow_rect_mut(
            &mut overlay,
            Rect::at(x0, y0).of_size(measurements.width, measurements.height),
            BOUNDS,
        );
    }

    overlay
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn block_mask() -> GrayImage {
        // 4x3 foreground block inside a 10x10 image, top-left at (2, 4).
        let mut mask = GrayImage::new(10, 10);
        for y in 4..7 {
            for x in 2..6 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask
    }

    #[test]
    fn measures_block_geometry() {
        let m = measure_mask(&block_mask());
        assert_eq!(m.area, 12.0);
        assert_eq!(m.width, 4);
        assert_eq!(m.height, 3);
        assert!((m.centroid_x - 3.5).abs() < 1e-9);
        assert!((m.centroid_y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn perimeter_counts_boundary_pixels_only() {
        let m = measure_mask(&block_mask());
        // A 4x3 block has 12 pixels, 2 of which are interior-free: every
        // pixel of a 3-row block touches background except the middle two.
        assert_eq!(m.perimeter, 10.0);
    }

    #[test]
    fn empty_mask_measures_zero() {
        let m = measure_mask(&GrayImage::new(5, 5));
        assert_eq!(m, ShapeMeasurements::default());
    }

    #[test]
    fn overlay_marks_boundary() {
        let img = RgbImage::new(10, 10);
        let mask = block_mask();
        let overlay = outline_overlay(&img, &mask, &measure_mask(&mask));
        assert_eq!(*overlay.get_pixel(2, 4), OUTLINE);
    }
}
