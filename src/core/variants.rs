//! # Variant Extraction
//!
//! After the ordered operations run, a fixed routine derives the named,
//! presentable image variants from whatever the context accumulated.
//!
//! Gating is deliberately dual: most variants key off the *applied* set
//! (what actually ran), but composite requests key off the *requested* set
//! - a `crop_blur` request must surface the final blurred crop even though
//! the concrete operation that produced it is named `blur`. Partial
//! pipelines yield partial variant sets, never errors.

use crate::core::context::{Channel, Context};
use crate::core::resolver::ExecutionPlan;
use image::DynamicImage;

/// An insertion-ordered set of named derived images.
///
/// Order is the presentation order of the montage grid.
#[derive(Debug, Default)]
pub struct VariantSet {
    entries: Vec<(&'static str, DynamicImage)>,
}

impl VariantSet {
    fn push(&mut self, name: &'static str, image: DynamicImage) {
        self.entries.push((name, image));
    }

    pub fn get(&self, name: &str) -> Option<&DynamicImage> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, img)| img)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(n, _)| *n).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DynamicImage)> {
        self.entries.iter().map(|(n, img)| (*n, img))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The variant a requested operation name surfaces, for "show/save only
/// the final requested output" mode.
pub fn variant_for_request(name: &str) -> Option<&'static str> {
    Some(match name {
        "gaussian_blur" => "gaussian_blur",
        "rgb2lab" => "lab_l",
        "mask" | "otsu" => "mask",
        "fill_holes" => "fill_holes",
        "analyse" => "analyse",
        "select_mask" | "hull_fill" => "select_mask",
        "veins" => "veins",
        "remove_background" => "remove_background",
        "crop" => "crop",
        "blur" | "crop_blur" => "crop_blur",
        _ => return None,
    })
}

/// Derive the variant set from a finished context.
pub fn extract_variants(ctx: &Context, plan: &ExecutionPlan) -> VariantSet {
    let mut variants = VariantSet::default();

    variants.push(
        "original",
        DynamicImage::ImageRgb8(ctx.history.original().clone()),
    );

    if plan.was_applied("gaussian_blur") {
        if let Some(blurred) = &ctx.pre_blur {
            variants.push("gaussian_blur", DynamicImage::ImageRgb8(blurred.clone()));
        }
    }

    if let Some(channels) = &ctx.channels {
        variants.push(
            "lab_l",
            DynamicImage::ImageLuma8(channels.get(Channel::L).clone()),
        );
    }

    if let Some(masks) = &ctx.masks {
        // Without a selection yet, fall back to the lightness channel.
        let channel = ctx.selected.unwrap_or(Channel::L);
        variants.push(
            "mask",
            DynamicImage::ImageLuma8(masks.get(channel).clone()),
        );

        if ctx.holes_filled {
            variants.push(
                "fill_holes",
                DynamicImage::ImageLuma8(masks.get(channel).clone()),
            );
        }

        if let Some(selected) = ctx.selected {
            variants.push(
                "select_mask",
                DynamicImage::ImageLuma8(masks.get(selected).clone()),
            );
        }
    }

    if let (Some(outlines), Some(selected)) = (&ctx.outlines, ctx.selected) {
        variants.push(
            "analyse",
            DynamicImage::ImageRgb8(outlines.get(selected).clone()),
        );
    }

    if let (Some(veins), Some(selected)) = (&ctx.veins, ctx.selected) {
        variants.push(
            "veins",
            DynamicImage::ImageLuma8(veins.get(selected).clone()),
        );
    }

    for op in ["remove_background", "crop"] {
        if plan.was_applied(op) {
            if let Some(img) = ctx.history.get(op) {
                variants.push(op, DynamicImage::ImageRgb8(img.clone()));
            }
        }
    }

    // Composite-alias intent: a crop_blur request surfaces the blurred
    // crop even though the applied operation is named `blur`.
    if plan.was_applied("blur") || plan.was_requested("crop_blur") {
        if let Some(img) = ctx.history.get("blur") {
            variants.push("crop_blur", DynamicImage::ImageRgb8(img.clone()));
        }
    }

    variants
}
