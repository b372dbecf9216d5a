//! sRGB to CIELAB channel extraction.
//!
//! The `image` ecosystem has no CIELAB conversion, so the standard
//! sRGB -> linear RGB -> XYZ (D65) -> L*a*b* chain is implemented here.
//! Channels are scaled to `u8` the way OpenCV does: `L* * 255/100`,
//! `a* + 128`, `b* + 128`.

use crate::core::context::{Channel, ChannelMap};
use image::{GrayImage, RgbImage};

/// D65 reference white.
const XN: f64 = 0.950_47;
const YN: f64 = 1.0;
const ZN: f64 = 1.088_83;

fn srgb_to_linear(c: u8) -> f64 {
    let c = f64::from(c) / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

fn clamp_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert one sRGB pixel to scaled `(L, a, b)` bytes.
fn pixel_to_lab(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rl, gl, bl) = (srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));

    let x = 0.412_456_4 * rl + 0.357_576_1 * gl + 0.180_437_5 * bl;
    let y = 0.212_672_9 * rl + 0.715_152_2 * gl + 0.072_175_0 * bl;
    let z = 0.019_333_9 * rl + 0.119_192_0 * gl + 0.950_304_1 * bl;

    let (fx, fy, fz) = (lab_f(x / XN), lab_f(y / YN), lab_f(z / ZN));

    let l_star = 116.0 * fy - 16.0;
    let a_star = 500.0 * (fx - fy);
    let b_star = 200.0 * (fy - fz);

    (
        clamp_u8(l_star * 255.0 / 100.0),
        clamp_u8(a_star + 128.0),
        clamp_u8(b_star + 128.0),
    )
}

/// Split an RGB image into per-channel CIELAB grayscale maps.
pub fn rgb_to_lab_channels(image: &RgbImage) -> ChannelMap<GrayImage> {
    let (width, height) = image.dimensions();
    let mut l_img = GrayImage::new(width, height);
    let mut a_img = GrayImage::new(width, height);
    let mut b_img = GrayImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let (l_v, a_v, b_v) = pixel_to_lab(r, g, b);
        l_img.put_pixel(x, y, image::Luma([l_v]));
        a_img.put_pixel(x, y, image::Luma([a_v]));
        b_img.put_pixel(x, y, image::Luma([b_v]));
    }

    ChannelMap::from_fn(|ch| match ch {
        Channel::L => l_img.clone(),
        Channel::A => a_img.clone(),
        Channel::B => b_img.clone(),
    })
}
