//! Blur and local-statistics filters.
//!
//! Wraps [`imageproc::filter::gaussian_blur_f32`], which operates on a
//! single grayscale channel; RGB blurring splits the image into planes,
//! blurs each and recombines. The windowed standard-deviation filter used
//! for vein extraction is implemented with integral images.

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Map an odd kernel size to a gaussian sigma.
///
/// Even sizes are corrected upward to the next odd value. The mapping is
/// the conventional `0.3 * ((k - 1) / 2 - 1) + 0.8`, so a 7-kernel blur
/// runs at sigma 1.4.
pub fn kernel_to_sigma(kernel: u32) -> f32 {
    let k = if kernel % 2 == 0 { kernel + 1 } else { kernel };
    let k = k.max(1) as f32;
    0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8
}

/// Gaussian-blur an RGB image with the given kernel size.
pub fn gaussian_blur_rgb(image: &RgbImage, kernel: u32) -> RgbImage {
    let sigma = kernel_to_sigma(kernel);
    if sigma <= 0.0 {
        return image.clone();
    }

    let (width, height) = image.dimensions();

    let planes: [GrayImage; 3] = std::array::from_fn(|c| {
        GrayImage::from_fn(width, height, |x, y| Luma([image.get_pixel(x, y).0[c]]))
    });

    let blurred: [GrayImage; 3] =
        std::array::from_fn(|c| imageproc::filter::gaussian_blur_f32(&planes[c], sigma));

    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            blurred[0].get_pixel(x, y).0[0],
            blurred[1].get_pixel(x, y).0[0],
            blurred[2].get_pixel(x, y).0[0],
        ])
    })
}

/// Windowed standard deviation of a grayscale image.
///
/// The window is `kernel x kernel`, clamped at image borders. Output values
/// are the rounded standard deviation, saturating at 255.
pub fn stddev_filter(image: &GrayImage, kernel: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let w = width as usize;
    let h = height as usize;
    let radius = (kernel.max(1) / 2) as i64;

    // Integral images of values and squared values, (w+1) x (h+1).
    let mut sum = vec![0f64; (w + 1) * (h + 1)];
    let mut sum_sq = vec![0f64; (w + 1) * (h + 1)];
    let stride = w + 1;

    for y in 0..h {
        for x in 0..w {
            let v = f64::from(image.get_pixel(x as u32, y as u32).0[0]);
            let idx = (y + 1) * stride + (x + 1);
            sum[idx] = v + sum[idx - 1] + sum[idx - stride] - sum[idx - stride - 1];
            sum_sq[idx] =
                v * v + sum_sq[idx - 1] + sum_sq[idx - stride] - sum_sq[idx - stride - 1];
        }
    }

    let window = |table: &[f64], x0: usize, y0: usize, x1: usize, y1: usize| -> f64 {
        table[y1 * stride + x1] - table[y0 * stride + x1] - table[y1 * stride + x0]
            + table[y0 * stride + x0]
    };

    GrayImage::from_fn(width, height, |x, y| {
        let x0 = (i64::from(x) - radius).max(0) as usize;
        let y0 = (i64::from(y) - radius).max(0) as usize;
        let x1 = ((i64::from(x) + radius + 1).min(w as i64)) as usize;
        let y1 = ((i64::from(y) + radius + 1).min(h as i64)) as usize;

        let n = ((x1 - x0) * (y1 - y0)) as f64;
        let s = window(&sum, x0, y0, x1, y1);
        let s2 = window(&sum_sq, x0, y0, x1, y1);
        let variance = (s2 / n - (s / n) * (s / n)).max(0.0);

        Luma([variance.sqrt().round().clamp(0.0, 255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_seven_maps_to_sigma_one_point_four() {
        assert!((kernel_to_sigma(7) - 1.4).abs() < 1e-6);
    }

    #[test]
    fn even_kernel_is_corrected_upward() {
        assert_eq!(kernel_to_sigma(6), kernel_to_sigma(7));
    }

    #[test]
    fn blur_preserves_dimensions() {
        let img = RgbImage::new(12, 9);
        let blurred = gaussian_blur_rgb(&img, 5);
        assert_eq!(blurred.dimensions(), (12, 9));
    }

    #[test]
    fn blur_of_flat_image_is_identity() {
        let img = RgbImage::from_pixel(8, 8, Rgb([90, 120, 40]));
        let blurred = gaussian_blur_rgb(&img, 7);
        assert_eq!(blurred, img);
    }

    #[test]
    fn stddev_of_flat_image_is_zero() {
        let img = GrayImage::from_pixel(10, 10, Luma([77]));
        let out = stddev_filter(&img, 7);
        assert!(out.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn stddev_peaks_at_an_edge() {
        let mut img = GrayImage::from_pixel(10, 10, Luma([0]));
        for y in 0..10 {
            for x in 5..10 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        let out = stddev_filter(&img, 7);
        let at_edge = out.get_pixel(5, 5).0[0];
        let far_away = out.get_pixel(0, 5).0[0];
        assert!(at_edge > far_away);
    }

    #[test]
    fn stddev_is_deterministic() {
        let mut img = GrayImage::new(16, 16);
        for (i, p) in img.pixels_mut().enumerate() {
            p.0[0] = ((i * 37) % 251) as u8;
        }
        assert_eq!(stddev_filter(&img, 7), stddev_filter(&img, 7));
    }
}
