//! `remove_background`: blank everything outside the selected mask.

use super::Operation;
use crate::core::context::Context;
use crate::core::imaging::{apply_mask_rgb, MaskBackground};
use crate::error::OpError;
use image::RgbImage;

/// Background removal against the selected channel's mask. Replaces the
/// current image with the masked one.
#[derive(Debug)]
pub struct RemoveBackground {
    background: MaskBackground,
}

impl RemoveBackground {
    pub const NAME: &'static str = "remove_background";

    pub fn new(background: MaskBackground) -> Self {
        Self { background }
    }
}

impl Default for RemoveBackground {
    fn default() -> Self {
        Self::new(MaskBackground::White)
    }
}

impl Operation for RemoveBackground {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: RgbImage, ctx: &mut Context) -> Result<RgbImage, OpError> {
        let selected = ctx.selected(Self::NAME)?;
        let masks = ctx.masks(Self::NAME)?;
        Ok(apply_mask_rgb(&image, masks.get(selected), self.background))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::{Channel, ChannelMap};
    use crate::core::ops::testutil::leaf_image;
    use image::{GrayImage, Luma};

    #[test]
    fn requires_selection() {
        let img = leaf_image();
        let mut ctx = Context::new(img.clone());
        let err = RemoveBackground::default().apply(img, &mut ctx).unwrap_err();
        assert!(matches!(
            err,
            OpError::MissingContextKey {
                producer: "select_mask",
                ..
            }
        ));
    }

    #[test]
    fn whitens_outside_selected_mask() {
        let img = leaf_image();
        let mut ctx = Context::new(img.clone());

        let mut mask = GrayImage::new(64, 64);
        mask.put_pixel(32, 32, Luma([255]));
        ctx.masks = Some(ChannelMap::from_fn(|_| mask.clone()));
        ctx.selected = Some(Channel::A);

        let out = RemoveBackground::default().apply(img.clone(), &mut ctx).unwrap();
        assert_eq!(out.get_pixel(32, 32), img.get_pixel(32, 32));
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255]);
    }
}
