//! `fill_holes`: close interior holes in every channel mask.

use super::Operation;
use crate::core::context::Context;
use crate::core::imaging::fill_holes;
use crate::error::OpError;
use image::RgbImage;

/// Hole closing. Overwrites the masks in place and sets the
/// `holes_filled` marker so variant extraction can tell filled masks from
/// raw ones.
#[derive(Debug)]
pub struct FillHoles;

impl FillHoles {
    pub const NAME: &'static str = "fill_holes";
}

impl Operation for FillHoles {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: RgbImage, ctx: &mut Context) -> Result<RgbImage, OpError> {
        let masks = ctx.masks(Self::NAME)?;
        let filled = masks.map(|_, mask| fill_holes(mask));
        ctx.masks = Some(filled);
        ctx.holes_filled = true;
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Channel;
    use crate::core::ops::testutil::leaf_image;
    use crate::core::ops::{OtsuMask, Rgb2Lab};

    #[test]
    fn requires_masks() {
        let img = leaf_image();
        let mut ctx = Context::new(img.clone());
        let err = FillHoles.apply(img, &mut ctx).unwrap_err();
        assert!(matches!(err, OpError::MissingContextKey { .. }));
    }

    #[test]
    fn overwrites_masks_and_sets_marker() {
        let img = leaf_image();
        let mut ctx = Context::new(img.clone());
        Rgb2Lab.apply(img.clone(), &mut ctx).unwrap();
        OtsuMask.apply(img.clone(), &mut ctx).unwrap();

        let raw_area: u32 = ctx
            .masks
            .as_ref()
            .unwrap()
            .get(Channel::A)
            .pixels()
            .filter(|p| p.0[0] != 0)
            .count() as u32;

        FillHoles.apply(img, &mut ctx).unwrap();
        assert!(ctx.holes_filled);

        let filled_area: u32 = ctx
            .masks
            .as_ref()
            .unwrap()
            .get(Channel::A)
            .pixels()
            .filter(|p| p.0[0] != 0)
            .count() as u32;

        // The leaf test image has a hole in the disc, so filling can only
        // grow the mask.
        assert!(filled_area >= raw_area);
    }
}
