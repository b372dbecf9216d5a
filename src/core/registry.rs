//! # Operation Registry
//!
//! Maps operation names to factories. The table is populated once by
//! [`OpRegistry::standard`] at startup and never mutated afterwards, so it
//! is safe to share or rebuild freely across workers.

use crate::core::imaging::MaskBackground;
use crate::core::ops::{
    Analyse, Crop, FillHoles, HullFill, Operation, OtsuMask, PostBlur, PreBlur, RemoveBackground,
    Rgb2Lab, SelectMask, Veins,
};
use crate::error::ResolveError;
use std::collections::BTreeMap;

/// Construction parameters for parametrized operations.
#[derive(Debug, Clone)]
pub struct OpConfig {
    /// Kernel size for the `gaussian_blur` pre-blur.
    pub pre_blur_kernel: u32,
    /// Kernel size for the `blur` post-blur.
    pub post_blur_kernel: u32,
    /// Extra pixels around the measured bounding box when cropping.
    pub crop_margin: u32,
    /// Canonical side length crops are resized to.
    pub crop_size: u32,
}

impl Default for OpConfig {
    fn default() -> Self {
        Self {
            pre_blur_kernel: PreBlur::DEFAULT_KERNEL,
            post_blur_kernel: PostBlur::DEFAULT_KERNEL,
            crop_margin: Crop::DEFAULT_MARGIN,
            crop_size: Crop::DEFAULT_SIZE,
        }
    }
}

type Factory = fn(&OpConfig) -> Box<dyn Operation>;

/// The startup-populated name -> factory table.
pub struct OpRegistry {
    factories: BTreeMap<&'static str, Factory>,
}

impl OpRegistry {
    /// The standard registry with every built-in operation.
    pub fn standard() -> Self {
        let mut registry = Self {
            factories: BTreeMap::new(),
        };
        registry.register(PreBlur::NAME, |cfg| {
            Box::new(PreBlur::new(cfg.pre_blur_kernel))
        });
        registry.register(Rgb2Lab::NAME, |_| Box::new(Rgb2Lab));
        registry.register(OtsuMask::NAME, |_| Box::new(OtsuMask));
        registry.register(FillHoles::NAME, |_| Box::new(FillHoles));
        registry.register(Analyse::NAME, |_| Box::new(Analyse));
        registry.register(SelectMask::NAME, |_| Box::new(SelectMask));
        registry.register(Veins::NAME, |_| Box::new(Veins));
        registry.register(RemoveBackground::NAME, |_| {
            Box::new(RemoveBackground::new(MaskBackground::White))
        });
        registry.register(HullFill::NAME, |_| Box::new(HullFill));
        registry.register(Crop::NAME, |cfg| {
            Box::new(Crop::new(cfg.crop_margin, cfg.crop_size))
        });
        registry.register(PostBlur::NAME, |cfg| {
            Box::new(PostBlur::new(cfg.post_blur_kernel))
        });
        registry
    }

    fn register(&mut self, name: &'static str, factory: Factory) {
        self.factories.insert(name, factory);
    }

    /// Build an operation instance by name.
    pub fn build(
        &self,
        name: &str,
        config: &OpConfig,
    ) -> Result<Box<dyn Operation>, ResolveError> {
        match self.factories.get(name) {
            Some(factory) => Ok(factory(config)),
            None => Err(ResolveError::UnknownOperation {
                name: name.to_string(),
                available: self.available_ops().join(", "),
            }),
        }
    }

    /// True when `name` is a registered operation.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// The interned registry key for `name`, if registered.
    pub fn canonical_name(&self, name: &str) -> Option<&'static str> {
        self.factories.get_key_value(name).map(|(key, _)| *key)
    }

    /// Sorted operation names, for validation and help text.
    pub fn available_ops(&self) -> Vec<&'static str> {
        // BTreeMap keys are already sorted.
        self.factories.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_contains_all_builtins() {
        let registry = OpRegistry::standard();
        for name in [
            "gaussian_blur",
            "rgb2lab",
            "mask",
            "fill_holes",
            "analyse",
            "select_mask",
            "veins",
            "remove_background",
            "hull_fill",
            "crop",
            "blur",
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn available_ops_is_sorted() {
        let ops = OpRegistry::standard().available_ops();
        let mut sorted = ops.clone();
        sorted.sort_unstable();
        assert_eq!(ops, sorted);
    }

    #[test]
    fn build_unknown_operation_fails_with_available_list() {
        let registry = OpRegistry::standard();
        let err = registry.build("sharpen", &OpConfig::default()).unwrap_err();
        let ResolveError::UnknownOperation { name, available } = err;
        assert_eq!(name, "sharpen");
        assert!(available.contains("rgb2lab"));
    }

    #[test]
    fn built_operation_reports_its_name() {
        let registry = OpRegistry::standard();
        let op = registry.build("crop", &OpConfig::default()).unwrap();
        assert_eq!(op.name(), "crop");
    }
}
