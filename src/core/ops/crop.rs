//! `crop`: cut the selected leaf region out and resize it to the
//! canonical classifier input size.

use super::Operation;
use crate::core::context::Context;
use crate::error::OpError;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Centroid-centered crop.
///
/// The sub-rectangle is centered on the selected channel's centroid with
/// half-extents of half the measured bounding box plus a margin, clamped to
/// the image; the result is resized to `size x size`.
#[derive(Debug)]
pub struct Crop {
    margin: u32,
    size: u32,
}

impl Crop {
    pub const NAME: &'static str = "crop";
    pub const DEFAULT_MARGIN: u32 = 0;
    pub const DEFAULT_SIZE: u32 = 256;

    pub fn new(margin: u32, size: u32) -> Self {
        Self { margin, size }
    }
}

impl Operation for Crop {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: RgbImage, ctx: &mut Context) -> Result<RgbImage, OpError> {
        let selected = ctx.selected(Self::NAME)?;
        let measurements = ctx.measurements(Self::NAME)?;
        let m = measurements.get(selected);

        if m.width == 0 || m.height == 0 {
            return Err(OpError::EmptyMask { channel: selected });
        }

        let (img_w, img_h) = (i64::from(image.width()), i64::from(image.height()));
        let half_w = i64::from(m.width / 2 + self.margin);
        let half_h = i64::from(m.height / 2 + self.margin);
        let center_x = m.centroid_x.round() as i64;
        let center_y = m.centroid_y.round() as i64;

        let x1 = (center_x - half_w).max(0);
        let y1 = (center_y - half_h).max(0);
        let x2 = (center_x + half_w).min(img_w);
        let y2 = (center_y + half_h).min(img_h);

        if x2 <= x1 || y2 <= y1 {
            return Err(OpError::EmptyMask { channel: selected });
        }

        let cropped = imageops::crop_imm(
            &image,
            x1 as u32,
            y1 as u32,
            (x2 - x1) as u32,
            (y2 - y1) as u32,
        )
        .to_image();

        Ok(imageops::resize(
            &cropped,
            self.size,
            self.size,
            FilterType::Triangle,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::{Channel, ChannelMap, ShapeMeasurements};
    use crate::core::ops::testutil::leaf_image;

    fn context_with_selection(m: ShapeMeasurements) -> Context {
        let mut ctx = Context::new(leaf_image());
        ctx.measurements = Some(ChannelMap::from_fn(|_| m.clone()));
        ctx.selected = Some(Channel::A);
        ctx
    }

    #[test]
    fn requires_selection_and_measurements() {
        let img = leaf_image();
        let mut ctx = Context::new(img.clone());
        let err = Crop::new(0, 64).apply(img, &mut ctx).unwrap_err();
        assert!(matches!(err, OpError::MissingContextKey { .. }));
    }

    #[test]
    fn output_is_canonical_size() {
        let m = ShapeMeasurements {
            area: 100.0,
            perimeter: 40.0,
            width: 40,
            height: 40,
            centroid_x: 32.0,
            centroid_y: 32.0,
        };
        let mut ctx = context_with_selection(m);
        let out = Crop::new(4, 128).apply(leaf_image(), &mut ctx).unwrap();
        assert_eq!(out.dimensions(), (128, 128));
    }

    #[test]
    fn window_is_clamped_to_image_bounds() {
        // Centroid near the corner; the window would extend past the edge.
        let m = ShapeMeasurements {
            area: 50.0,
            perimeter: 30.0,
            width: 30,
            height: 30,
            centroid_x: 2.0,
            centroid_y: 2.0,
        };
        let mut ctx = context_with_selection(m);
        let out = Crop::new(0, 64).apply(leaf_image(), &mut ctx).unwrap();
        assert_eq!(out.dimensions(), (64, 64));
    }

    #[test]
    fn zero_geometry_is_an_error() {
        let mut ctx = context_with_selection(ShapeMeasurements::default());
        let err = Crop::new(0, 64).apply(leaf_image(), &mut ctx).unwrap_err();
        assert!(matches!(err, OpError::EmptyMask { .. }));
    }
}
