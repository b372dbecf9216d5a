//! The two gaussian blur operations: the optional pre-blur that smooths the
//! input before channel splitting, and the post-blur that finishes the
//! background-removed crop.

use super::Operation;
use crate::core::context::Context;
use crate::core::imaging::gaussian_blur_rgb;
use crate::error::OpError;
use image::RgbImage;

/// `gaussian_blur`: smooth the input image before anything else runs.
///
/// Writes the blurred copy into the context (where `rgb2lab` picks it up)
/// and leaves the current image untouched.
#[derive(Debug)]
pub struct PreBlur {
    kernel: u32,
}

impl PreBlur {
    pub const NAME: &'static str = "gaussian_blur";
    pub const DEFAULT_KERNEL: u32 = 5;

    pub fn new(kernel: u32) -> Self {
        Self { kernel }
    }
}

impl Operation for PreBlur {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: RgbImage, ctx: &mut Context) -> Result<RgbImage, OpError> {
        if !ctx.is_pristine() {
            return Err(OpError::MustRunFirst {
                operation: Self::NAME,
            });
        }
        ctx.pre_blur = Some(gaussian_blur_rgb(&image, self.kernel));
        Ok(image)
    }
}

/// `blur`: gaussian-blur the current image.
///
/// The final step of the composite `crop_blur` request; replaces the
/// current image.
#[derive(Debug)]
pub struct PostBlur {
    kernel: u32,
}

impl PostBlur {
    pub const NAME: &'static str = "blur";
    pub const DEFAULT_KERNEL: u32 = 7;

    pub fn new(kernel: u32) -> Self {
        Self { kernel }
    }
}

impl Operation for PostBlur {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: RgbImage, _ctx: &mut Context) -> Result<RgbImage, OpError> {
        Ok(gaussian_blur_rgb(&image, self.kernel))
    }
}
