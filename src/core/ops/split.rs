//! `rgb2lab`: split the image into per-channel CIELAB grayscale maps.

use super::Operation;
use crate::core::context::Context;
use crate::core::imaging::rgb_to_lab_channels;
use crate::error::OpError;
use image::RgbImage;

/// Channel split. Prefers the pre-blurred copy when `gaussian_blur` ran;
/// idempotent when the channels are already present.
#[derive(Debug)]
pub struct Rgb2Lab;

impl Rgb2Lab {
    pub const NAME: &'static str = "rgb2lab";
}

impl Operation for Rgb2Lab {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: RgbImage, ctx: &mut Context) -> Result<RgbImage, OpError> {
        if ctx.channels.is_none() {
            let source = ctx.pre_blur.as_ref().unwrap_or(&image);
            ctx.channels = Some(rgb_to_lab_channels(source));
        }
        Ok(image)
    }
}
