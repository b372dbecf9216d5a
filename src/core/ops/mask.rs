//! `mask`: Otsu-threshold each CIELAB channel into a binary mask.

use super::Operation;
use crate::core::context::{Channel, Context};
use crate::core::imaging::{otsu_mask, MaskPolarity};
use crate::error::OpError;
use image::RgbImage;

/// Per-channel Otsu binarization.
///
/// Leaf tissue reads dark in `L` and `a` but bright in `b`, so the `b`
/// channel thresholds with light-objects polarity and the others with dark.
#[derive(Debug)]
pub struct OtsuMask;

impl OtsuMask {
    pub const NAME: &'static str = "mask";

    fn polarity(channel: Channel) -> MaskPolarity {
        match channel {
            Channel::B => MaskPolarity::LightObjects,
            Channel::L | Channel::A => MaskPolarity::DarkObjects,
        }
    }
}

impl Operation for OtsuMask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: RgbImage, ctx: &mut Context) -> Result<RgbImage, OpError> {
        let channels = ctx.channels(Self::NAME)?;
        let masks = channels.map(|ch, gray| otsu_mask(gray, Self::polarity(ch)));
        ctx.masks = Some(masks);
        Ok(image)
    }
}
