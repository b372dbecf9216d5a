//! `veins`: highlight vein structure per channel.
//!
//! For each channel the lightness map is restricted to that channel's mask,
//! run through a windowed standard-deviation filter and thresholded -
//! texture-rich regions (veins, lesion edges) light up, flat tissue stays
//! dark.

use super::Operation;
use crate::core::context::{Channel, Context};
use crate::core::imaging::{apply_mask_gray, stddev_filter};
use crate::error::OpError;
use image::{Luma, RgbImage};

const STDDEV_WINDOW: u32 = 7;
const VEIN_THRESHOLD: u8 = 9;

/// Vein extraction over every channel mask.
#[derive(Debug)]
pub struct Veins;

impl Veins {
    pub const NAME: &'static str = "veins";
}

impl Operation for Veins {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: RgbImage, ctx: &mut Context) -> Result<RgbImage, OpError> {
        let channels = ctx.channels(Self::NAME)?;
        let masks = ctx.masks(Self::NAME)?;
        let lightness = channels.get(Channel::L);

        let veins = masks.map(|_, mask| {
            let masked = apply_mask_gray(lightness, mask);
            let deviation = stddev_filter(&masked, STDDEV_WINDOW);
            image::GrayImage::from_fn(deviation.width(), deviation.height(), |x, y| {
                let v = deviation.get_pixel(x, y).0[0];
                Luma([if v >= VEIN_THRESHOLD { 255 } else { 0 }])
            })
        });

        ctx.veins = Some(veins);
        Ok(image)
    }
}
