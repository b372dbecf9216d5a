//! `hull_fill`: close concavities in the selected mask via convex hulls.

use super::Operation;
use crate::core::context::Context;
use crate::core::imaging::hull_correct;
use crate::error::OpError;
use image::RgbImage;

/// Convex-hull correction of the selected channel's mask, overwriting it
/// in place. Fails with [`OpError::EmptyMask`] when the mask has no
/// contours to hull.
#[derive(Debug)]
pub struct HullFill;

impl HullFill {
    pub const NAME: &'static str = "hull_fill";
}

impl Operation for HullFill {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: RgbImage, ctx: &mut Context) -> Result<RgbImage, OpError> {
        let selected = ctx.selected(Self::NAME)?;
        let masks = ctx.masks_mut(Self::NAME)?;

        let corrected = hull_correct(masks.get(selected))
            .ok_or(OpError::EmptyMask { channel: selected })?;
        masks.set(selected, corrected);
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::{Channel, ChannelMap};
    use crate::core::ops::testutil::leaf_image;
    use image::{GrayImage, Luma};

    fn notched_mask() -> GrayImage {
        let mut mask = GrayImage::new(16, 16);
        for y in 2..14 {
            for x in 2..14 {
                if !(x >= 8 && y >= 8) {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        mask
    }

    #[test]
    fn corrects_selected_mask_in_place() {
        let img = leaf_image();
        let mut ctx = Context::new(img.clone());
        ctx.masks = Some(ChannelMap::from_fn(|_| notched_mask()));
        ctx.selected = Some(Channel::B);

        HullFill.apply(img, &mut ctx).unwrap();

        let masks = ctx.masks.as_ref().unwrap();
        // The notch is filled in the selected channel...
        assert_eq!(masks.get(Channel::B).get_pixel(10, 10).0[0], 255);
        // ...and untouched elsewhere.
        assert_eq!(masks.get(Channel::L).get_pixel(10, 10).0[0], 0);
    }

    #[test]
    fn empty_selected_mask_is_an_error() {
        let img = leaf_image();
        let mut ctx = Context::new(img.clone());
        ctx.masks = Some(ChannelMap::from_fn(|_| GrayImage::new(16, 16)));
        ctx.selected = Some(Channel::L);

        let err = HullFill.apply(img, &mut ctx).unwrap_err();
        assert!(matches!(
            err,
            OpError::EmptyMask {
                channel: Channel::L
            }
        ));
    }
}
