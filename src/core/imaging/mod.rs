//! # Imaging Module
//!
//! The numerical primitives the pipeline operations orchestrate: color-space
//! conversion, blurring, thresholding, mask surgery and mask measurement.
//!
//! Everything in here is a pure function over pixel buffers - deterministic,
//! no I/O, no clocks, no randomness - so operation outputs are bit-identical
//! across runs.
//!
//! ## Modules
//! - `color` - sRGB to CIELAB channel extraction
//! - `filter` - gaussian blur and windowed standard deviation
//! - `threshold` - Otsu binarization with selectable polarity
//! - `morphology` - hole filling, mask application, convex-hull correction
//! - `measure` - geometric mask measurements and overlays

pub mod color;
pub mod filter;
pub mod measure;
pub mod morphology;
pub mod threshold;

pub use color::rgb_to_lab_channels;
pub use filter::{gaussian_blur_rgb, stddev_filter};
pub use measure::{measure_mask, outline_overlay};
pub use morphology::{apply_mask_gray, apply_mask_rgb, fill_holes, hull_correct, MaskBackground};
pub use threshold::{otsu_mask, MaskPolarity};
