//! Mask surgery: hole filling, mask application, convex-hull correction.
//!
//! Masks are `GrayImage`s with 255 for foreground and 0 for background.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use std::collections::VecDeque;

/// Background color substituted outside a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskBackground {
    White,
    Black,
}

/// Close interior holes in a binary mask.
///
/// Background regions not reachable from the image border are holes and
/// become foreground; everything else is left as-is.
pub fn fill_holes(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return mask.clone();
    }

    let w = width as usize;
    let h = height as usize;
    let mut outside = vec![false; w * h];
    let mut queue = VecDeque::new();

    let seed = |x: usize, y: usize, outside: &mut Vec<bool>, queue: &mut VecDeque<(usize, usize)>| {
        if mask.get_pixel(x as u32, y as u32).0[0] == 0 && !outside[y * w + x] {
            outside[y * w + x] = true;
            queue.push_back((x, y));
        }
    };

    for x in 0..w {
        seed(x, 0, &mut outside, &mut queue);
        seed(x, h - 1, &mut outside, &mut queue);
    }
    for y in 0..h {
        seed(0, y, &mut outside, &mut queue);
        seed(w - 1, y, &mut outside, &mut queue);
    }

    while let Some((x, y)) = queue.pop_front() {
        let neighbors = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbors {
            if nx < w && ny < h && !outside[ny * w + nx]
                && mask.get_pixel(nx as u32, ny as u32).0[0] == 0
            {
                outside[ny * w + nx] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        if mask.get_pixel(x, y).0[0] != 0 || !outside[y as usize * w + x as usize] {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Keep masked pixels, substitute the background color elsewhere.
pub fn apply_mask_rgb(image: &RgbImage, mask: &GrayImage, background: MaskBackground) -> RgbImage {
    let bg = match background {
        MaskBackground::White => Rgb([255, 255, 255]),
        MaskBackground::Black => Rgb([0, 0, 0]),
    };

    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        if mask.get_pixel(x, y).0[0] != 0 {
            *image.get_pixel(x, y)
        } else {
            bg
        }
    })
}

/// Grayscale mask application with a black background.
pub fn apply_mask_gray(image: &GrayImage, mask: &GrayImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if mask.get_pixel(x, y).0[0] != 0 {
            *image.get_pixel(x, y)
        } else {
            Luma([0])
        }
    })
}

/// Close concavities in a mask via its convex hulls.
///
/// The convex hull of each outer contour is filled, XORed against the mask,
/// and the difference ORed back in. Returns `None` when the mask has no
/// contours at all.
pub fn hull_correct(mask: &GrayImage) -> Option<GrayImage> {
    let contours = find_contours::<u32>(mask);

    let mut hull_mask = GrayImage::new(mask.width(), mask.height());
    let mut any = false;

    for contour in &contours {
        if contour.border_type != BorderType::Outer || contour.points.is_empty() {
            continue;
        }
        any = true;
        let points: Vec<(i64, i64)> = contour
            .points
            .iter()
            .map(|p| (i64::from(p.x), i64::from(p.y)))
            .collect();
        fill_convex_polygon(&mut hull_mask, &convex_hull(&points));
    }

    if !any {
        return None;
    }

    // or(mask, xor(hull, mask)) - spelled out so the intent stays visible
    let corrected = GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        let m = mask.get_pixel(x, y).0[0] != 0;
        let h = hull_mask.get_pixel(x, y).0[0] != 0;
        let xor = m != h;
        Luma([if m || xor { 255 } else { 0 }])
    });

    Some(corrected)
}

/// Andrew's monotone chain. Returns hull vertices in counter-clockwise
/// order without the closing point.
fn convex_hull(points: &[(i64, i64)]) -> Vec<(i64, i64)> {
    let mut pts: Vec<(i64, i64)> = points.to_vec();
    pts.sort_unstable();
    pts.dedup();

    if pts.len() <= 2 {
        return pts;
    }

    let cross = |o: (i64, i64), a: (i64, i64), b: (i64, i64)| -> i64 {
        (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
    };

    let mut hull: Vec<(i64, i64)> = Vec::with_capacity(pts.len() * 2);
    for &p in pts.iter().chain(pts.iter().rev().skip(1)) {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Scanline fill of a convex polygon.
fn fill_convex_polygon(canvas: &mut GrayImage, hull: &[(i64, i64)]) {
    if hull.is_empty() {
        return;
    }
    if hull.len() <= 2 {
        for &(x, y) in hull {
            if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
                canvas.put_pixel(x as u32, y as u32, Luma([255]));
            }
        }
        return;
    }

    let y_min = hull.iter().map(|p| p.1).min().unwrap_or(0);
    let y_max = hull.iter().map(|p| p.1).max().unwrap_or(0);

    for y in y_min.max(0)..=y_max.min(i64::from(canvas.height()) - 1) {
        let mut x_min = i64::MAX;
        let mut x_max = i64::MIN;

        for i in 0..hull.len() {
            let (x0, y0) = hull[i];
            let (x1, y1) = hull[(i + 1) % hull.len()];

            let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
            if y < lo || y > hi {
                continue;
            }
            if y0 == y1 {
                x_min = x_min.min(x0.min(x1));
                x_max = x_max.max(x0.max(x1));
            } else {
                let x = x0 + (x1 - x0) * (y - y0) / (y1 - y0);
                x_min = x_min.min(x);
                x_max = x_max.max(x);
            }
        }

        if x_min > x_max {
            continue;
        }
        for x in x_min.max(0)..=x_max.min(i64::from(canvas.width()) - 1) {
            canvas.put_pixel(x as u32, y as u32, Luma([255]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_mask() -> GrayImage {
        // 10x10 ring: foreground border of a 6x6 block, hollow center.
        let mut mask = GrayImage::new(10, 10);
        for y in 2..8 {
            for x in 2..8 {
                let on_ring = x == 2 || x == 7 || y == 2 || y == 7;
                if on_ring {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        mask
    }

    #[test]
    fn fill_holes_closes_interior() {
        let filled = fill_holes(&ring_mask());
        assert_eq!(filled.get_pixel(4, 4).0[0], 255);
        // Outside the ring stays background.
        assert_eq!(filled.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn fill_holes_on_solid_mask_is_identity() {
        let mask = GrayImage::from_pixel(6, 6, Luma([255]));
        assert_eq!(fill_holes(&mask), mask);
    }

    #[test]
    fn apply_mask_substitutes_background() {
        let img = RgbImage::from_pixel(3, 1, Rgb([10, 20, 30]));
        let mut mask = GrayImage::new(3, 1);
        mask.put_pixel(1, 0, Luma([255]));

        let white = apply_mask_rgb(&img, &mask, MaskBackground::White);
        assert_eq!(white.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(white.get_pixel(1, 0).0, [10, 20, 30]);

        let black = apply_mask_rgb(&img, &mask, MaskBackground::Black);
        assert_eq!(black.get_pixel(2, 0).0, [0, 0, 0]);
    }

    #[test]
    fn convex_hull_of_square_has_four_vertices() {
        let points = vec![(0, 0), (4, 0), (4, 4), (0, 4), (2, 2), (1, 3)];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
    }

    #[test]
    fn hull_correct_fills_a_notch() {
        // L-shaped mask: hull correction should close the missing corner.
        let mut mask = GrayImage::new(8, 8);
        for y in 1..7 {
            for x in 1..7 {
                if !(x >= 4 && y >= 4) {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        let corrected = hull_correct(&mask).expect("mask has contours");
        assert_eq!(corrected.get_pixel(4, 4).0[0], 255);
    }

    #[test]
    fn hull_correct_of_empty_mask_is_none() {
        let mask = GrayImage::new(8, 8);
        assert!(hull_correct(&mask).is_none());
    }
}
