//! `analyse`: measure each channel mask and build annotated overlays.

use super::Operation;
use crate::core::context::Context;
use crate::core::imaging::{measure_mask, outline_overlay};
use crate::error::OpError;
use image::RgbImage;
use tracing::warn;

/// Geometric analysis of the (filled) channel masks: area, perimeter,
/// bounding box and centroid per channel, plus an outline overlay drawn on
/// the current image.
#[derive(Debug)]
pub struct Analyse;

impl Analyse {
    pub const NAME: &'static str = "analyse";
}

impl Operation for Analyse {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: RgbImage, ctx: &mut Context) -> Result<RgbImage, OpError> {
        let masks = ctx.masks(Self::NAME)?;

        let measurements = masks.map(|ch, mask| {
            let m = measure_mask(mask);
            if m.area == 0.0 {
                warn!(channel = %ch, "no foreground pixels to analyse");
            }
            m
        });

        let outlines =
            masks.map(|ch, mask| outline_overlay(&image, mask, measurements.get(ch)));

        ctx.measurements = Some(measurements);
        ctx.outlines = Some(outlines);
        Ok(image)
    }
}
