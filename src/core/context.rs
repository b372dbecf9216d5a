//! Per-image pipeline state.
//!
//! The context is the side-channel that an ordered operation sequence reads
//! and writes while one image flows through it. Instead of an open-ended
//! string-keyed bag, it is a struct of explicitly-typed optional fields:
//! a field is `None` until the producing operation has run, and reading an
//! absent field is a hard [`OpError::MissingContextKey`] - never a silent
//! default.
//!
//! A fresh `Context` is built per image and dropped after variant
//! extraction; nothing in here is shared between images or workers.

use crate::error::OpError;
use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A CIELAB channel.
///
/// Iteration over [`ChannelMap`] always visits channels in `L, a, b` order,
/// which is what makes "first channel wins" tie-breaking well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    /// Lightness
    L,
    /// Green-red axis
    A,
    /// Blue-yellow axis
    B,
}

impl Channel {
    /// All channels in canonical iteration order.
    pub const ALL: [Channel; 3] = [Channel::L, Channel::A, Channel::B];

    /// Short lowercase key, used in variant names and logs.
    pub fn key(self) -> &'static str {
        match self {
            Channel::L => "l",
            Channel::A => "a",
            Channel::B => "b",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One value per CIELAB channel, iterated in fixed `L, a, b` order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMap<T> {
    l: T,
    a: T,
    b: T,
}

impl<T> ChannelMap<T> {
    /// Build a map by evaluating `f` once per channel, in order.
    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        Self {
            l: f(Channel::L),
            a: f(Channel::A),
            b: f(Channel::B),
        }
    }

    /// Fallible variant of [`ChannelMap::from_fn`].
    pub fn try_from_fn<E>(mut f: impl FnMut(Channel) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            l: f(Channel::L)?,
            a: f(Channel::A)?,
            b: f(Channel::B)?,
        })
    }

    pub fn get(&self, channel: Channel) -> &T {
        match channel {
            Channel::L => &self.l,
            Channel::A => &self.a,
            Channel::B => &self.b,
        }
    }

    pub fn set(&mut self, channel: Channel, value: T) {
        match channel {
            Channel::L => self.l = value,
            Channel::A => self.a = value,
            Channel::B => self.b = value,
        }
    }

    /// Iterate `(channel, value)` pairs in `L, a, b` order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.iter().map(move |&ch| (ch, self.get(ch)))
    }

    /// Build a new map by transforming each value, preserving order.
    pub fn map<U>(&self, mut f: impl FnMut(Channel, &T) -> U) -> ChannelMap<U> {
        ChannelMap::from_fn(|ch| f(ch, self.get(ch)))
    }
}

/// Geometric measurements of one channel's mask.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeMeasurements {
    /// Foreground pixel count
    pub area: f64,
    /// Boundary pixel count
    pub perimeter: f64,
    /// Bounding box width in pixels
    pub width: u32,
    /// Bounding box height in pixels
    pub height: u32,
    /// Foreground centroid, x
    pub centroid_x: f64,
    /// Foreground centroid, y
    pub centroid_y: f64,
}

/// The running image history: the current image as it stood after each
/// operation, keyed by operation name and seeded with `original`.
#[derive(Debug, Clone)]
pub struct ImageHistory {
    entries: Vec<(&'static str, RgbImage)>,
}

impl ImageHistory {
    /// Key under which the untouched input image is recorded.
    pub const ORIGINAL: &'static str = "original";

    pub fn new(original: RgbImage) -> Self {
        Self {
            entries: vec![(Self::ORIGINAL, original)],
        }
    }

    /// Record the image as it stands after `operation` ran.
    pub fn record(&mut self, operation: &'static str, image: RgbImage) {
        self.entries.push((operation, image));
    }

    /// The most recent image recorded under `operation`, if any.
    pub fn get(&self, operation: &str) -> Option<&RgbImage> {
        self.entries
            .iter()
            .rev()
            .find(|(name, _)| *name == operation)
            .map(|(_, img)| img)
    }

    /// The untouched input image.
    pub fn original(&self) -> &RgbImage {
        // Seeded in the constructor, so the entry always exists.
        self.get(Self::ORIGINAL)
            .unwrap_or_else(|| &self.entries[0].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-image mutable state threaded through an ordered operation sequence.
pub struct Context {
    /// Pre-blurred copy of the original, written by `gaussian_blur`.
    pub pre_blur: Option<RgbImage>,
    /// Per-channel CIELAB grayscale maps, written by `rgb2lab`.
    pub channels: Option<ChannelMap<GrayImage>>,
    /// Per-channel binary masks, written by `mask`; `fill_holes` and
    /// `hull_fill` overwrite entries in place.
    pub masks: Option<ChannelMap<GrayImage>>,
    /// Set once `fill_holes` has rewritten the masks.
    pub holes_filled: bool,
    /// Per-channel geometric measurements, written by `analyse`.
    pub measurements: Option<ChannelMap<ShapeMeasurements>>,
    /// Per-channel annotated analysis overlays, written by `analyse`.
    pub outlines: Option<ChannelMap<RgbImage>>,
    /// Channel chosen by `select_mask`.
    pub selected: Option<Channel>,
    /// Per-channel vein maps, written by `veins`.
    pub veins: Option<ChannelMap<GrayImage>>,
    /// Image-after-each-operation history.
    pub history: ImageHistory,
}

impl Context {
    pub fn new(original: RgbImage) -> Self {
        Self {
            pre_blur: None,
            channels: None,
            masks: None,
            holes_filled: false,
            measurements: None,
            outlines: None,
            selected: None,
            veins: None,
            history: ImageHistory::new(original),
        }
    }

    /// True while no operation has written anything yet.
    pub fn is_pristine(&self) -> bool {
        self.pre_blur.is_none()
            && self.channels.is_none()
            && self.masks.is_none()
            && !self.holes_filled
            && self.measurements.is_none()
            && self.selected.is_none()
            && self.veins.is_none()
            && self.history.len() == 1
    }

    pub fn channels(&self, operation: &'static str) -> Result<&ChannelMap<GrayImage>, OpError> {
        self.channels.as_ref().ok_or(OpError::MissingContextKey {
            operation,
            producer: "rgb2lab",
        })
    }

    pub fn masks(&self, operation: &'static str) -> Result<&ChannelMap<GrayImage>, OpError> {
        self.masks.as_ref().ok_or(OpError::MissingContextKey {
            operation,
            producer: "mask",
        })
    }

    pub fn masks_mut(
        &mut self,
        operation: &'static str,
    ) -> Result<&mut ChannelMap<GrayImage>, OpError> {
        self.masks.as_mut().ok_or(OpError::MissingContextKey {
            operation,
            producer: "mask",
        })
    }

    pub fn measurements(
        &self,
        operation: &'static str,
    ) -> Result<&ChannelMap<ShapeMeasurements>, OpError> {
        self.measurements
            .as_ref()
            .ok_or(OpError::MissingContextKey {
                operation,
                producer: "analyse",
            })
    }

    pub fn selected(&self, operation: &'static str) -> Result<Channel, OpError> {
        self.selected.ok_or(OpError::MissingContextKey {
            operation,
            producer: "select_mask",
        })
    }
}
