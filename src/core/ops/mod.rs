//! # Operations Module
//!
//! The named units of work the pipeline sequences. Every operation takes
//! the current image plus the per-image [`Context`], returns the (possibly
//! replaced) current image and records its artifacts in the context.
//!
//! ## Contract
//! - An operation checks its own context preconditions and raises
//!   [`OpError::MissingContextKey`] itself; the executor guarantees ordering
//!   but does not pre-validate.
//! - Given the same image and parameters the output is bit-identical: no
//!   clocks, no randomness.
//! - Instances are immutable once built; each worker builds its own set.

mod analyse;
mod background;
mod blur;
mod crop;
mod fill;
mod hull;
mod mask;
mod select;
mod split;
mod veins;

pub use analyse::Analyse;
pub use background::RemoveBackground;
pub use blur::{PostBlur, PreBlur};
pub use crop::Crop;
pub use fill::FillHoles;
pub use hull::HullFill;
pub use mask::OtsuMask;
pub use select::{compactness, smoothness, SelectMask};
pub use split::Rgb2Lab;
pub use veins::Veins;

use crate::core::context::Context;
use crate::error::OpError;
use image::RgbImage;
use std::fmt::Debug;

/// A named, composable unit of image transformation.
pub trait Operation: Send + Sync + Debug {
    /// Unique registry name.
    fn name(&self) -> &'static str;

    /// Run the operation: transform the current image and/or record
    /// artifacts in the context.
    fn apply(&self, image: RgbImage, ctx: &mut Context) -> Result<RgbImage, OpError>;
}

#[cfg(test)]
pub(crate) mod testutil {
    use image::{Rgb, RgbImage};

    /// A synthetic leaf: a bright green disc with a darker hole, on a
    /// brown background. Enough structure for every operation to find
    /// something to segment, fill and measure.
    pub fn leaf_image() -> RgbImage {
        let mut img = RgbImage::from_pixel(64, 64, Rgb([120, 90, 50]));
        let (cx, cy, r) = (32i32, 32i32, 20i32);
        for y in 0..64i32 {
            for x in 0..64i32 {
                let d2 = (x - cx).pow(2) + (y - cy).pow(2);
                if d2 <= r * r {
                    img.put_pixel(x as u32, y as u32, Rgb([50, 170, 60]));
                }
                // A small hole inside the disc.
                if (x - 26).pow(2) + (y - 28).pow(2) <= 4 {
                    img.put_pixel(x as u32, y as u32, Rgb([120, 90, 50]));
                }
            }
        }
        img
    }
}
