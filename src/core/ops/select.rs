//! `select_mask`: score each channel's mask and record the best one.

use super::Operation;
use crate::core::context::{Channel, Context};
use crate::error::OpError;
use image::RgbImage;
use tracing::debug;

const COMPACTNESS_WEIGHT: f64 = 1.0;
const SMOOTHNESS_WEIGHT: f64 = 0.8;
const EPSILON: f64 = 1e-6;

/// Isoperimetric compactness: `4πA / P²`. Near 1 for a circle, small for
/// ragged shapes.
pub fn compactness(area: f64, perimeter: f64) -> f64 {
    (4.0 * std::f64::consts::PI * area) / (perimeter * perimeter + EPSILON)
}

/// Area-to-perimeter ratio.
pub fn smoothness(area: f64, perimeter: f64) -> f64 {
    area / (perimeter + EPSILON)
}

/// Channel selection by weighted shape score.
///
/// Equal scores keep the earliest channel in `L, a, b` iteration order
/// (strict greater-than comparison).
#[derive(Debug)]
pub struct SelectMask;

impl SelectMask {
    pub const NAME: &'static str = "select_mask";

    fn score(area: f64, perimeter: f64) -> f64 {
        compactness(area, perimeter) * COMPACTNESS_WEIGHT
            + smoothness(area, perimeter) * SMOOTHNESS_WEIGHT
    }
}

impl Operation for SelectMask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: RgbImage, ctx: &mut Context) -> Result<RgbImage, OpError> {
        let measurements = ctx.measurements(Self::NAME)?;

        let mut best: Option<(Channel, f64)> = None;
        for (channel, m) in measurements.iter() {
            let score = Self::score(m.area, m.perimeter);
            debug!(channel = %channel, score, "channel score");
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((channel, score)),
            }
        }

        // ChannelMap always yields three entries, so best is always set.
        if let Some((channel, _)) = best {
            ctx.selected = Some(channel);
        }
        Ok(image)
    }
}
