//! # Single-Image Executor
//!
//! Drives one image through the resolved operation sequence: load, run the
//! ops while recording the image history, extract variants, persist.
//!
//! One executor is built per worker - the plan and operation instances are
//! injected at construction, never shared across workers.

use crate::core::context::Context;
use crate::core::ops::Operation;
use crate::core::persist::VariantWriter;
use crate::core::registry::{OpConfig, OpRegistry};
use crate::core::resolver::ExecutionPlan;
use crate::core::variants::{extract_variants, VariantSet};
use crate::error::{ImageReadError, LeafPipelineError, ResolveError};
use image::RgbImage;
use std::path::Path;
use tracing::debug;

/// Load and decode an image as RGB.
pub fn load_image(path: &Path) -> Result<RgbImage, ImageReadError> {
    if !path.exists() {
        return Err(ImageReadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|e| ImageReadError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Per-worker pipeline executor.
pub struct ImageExecutor {
    plan: ExecutionPlan,
    ops: Vec<Box<dyn Operation>>,
    writer: Option<VariantWriter>,
}

impl ImageExecutor {
    /// Build the operation instances for `plan` once, up front.
    pub fn new(
        plan: ExecutionPlan,
        registry: &OpRegistry,
        config: &OpConfig,
        writer: Option<VariantWriter>,
    ) -> Result<Self, ResolveError> {
        let ops = plan
            .ordered()
            .iter()
            .map(|name| registry.build(name, config))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { plan, ops, writer })
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    /// Run the operation sequence over an in-memory image.
    ///
    /// The context lives exactly as long as this call; it is dropped after
    /// variant extraction.
    pub fn run(&self, image: RgbImage) -> Result<VariantSet, LeafPipelineError> {
        let mut ctx = Context::new(image.clone());
        let mut current = image;

        for op in &self.ops {
            debug!(op = op.name(), "applying operation");
            current = op.apply(current, &mut ctx)?;
            ctx.history.record(op.name(), current.clone());
        }

        Ok(extract_variants(&ctx, &self.plan))
    }

    /// Full single-image pass: load, run, persist (when a writer is set).
    pub fn process(&self, path: &Path) -> Result<VariantSet, LeafPipelineError> {
        let image = load_image(path)?;
        let variants = self.run(image)?;

        if let Some(writer) = &self.writer {
            writer.write(path, &variants, &self.plan)?;
        }

        Ok(variants)
    }
}
