//! Integration tests for single-image execution:
//! - dependency-first resolution of composite requests
//! - variant gating for partial pipelines
//! - determinism of the full chain

use image::{GenericImageView, Rgb, RgbImage};
use leaf_pipeline::core::{resolve, ImageExecutor, OpConfig, OpRegistry};

/// A synthetic leaf: green disc on a brown background.
fn leaf_image() -> RgbImage {
    let mut img = RgbImage::from_pixel(64, 64, Rgb([120, 90, 50]));
    for y in 0..64i32 {
        for x in 0..64i32 {
            if (x - 32).pow(2) + (y - 32).pow(2) <= 400 {
                img.put_pixel(x as u32, y as u32, Rgb([50, 170, 60]));
            }
        }
    }
    img
}

fn ops(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn crop_blur_alias_resolves_to_full_chain_ending_with_blur() {
    let plan = resolve(&ops(&["crop_blur"]), &OpRegistry::standard()).unwrap();
    assert_eq!(
        plan.ordered(),
        &[
            "rgb2lab",
            "mask",
            "fill_holes",
            "analyse",
            "select_mask",
            "remove_background",
            "crop",
            "blur",
        ]
    );
}

#[test]
fn requesting_only_channel_split_gates_out_downstream_variants() {
    let registry = OpRegistry::standard();
    let plan = resolve(&ops(&["rgb2lab"]), &registry).unwrap();
    let executor = ImageExecutor::new(plan, &registry, &OpConfig::default(), None).unwrap();

    let variants = executor.run(leaf_image()).unwrap();
    assert_eq!(variants.names(), vec!["original", "lab_l"]);
}

#[test]
fn composite_request_surfaces_the_blurred_crop() {
    let registry = OpRegistry::standard();
    let plan = resolve(&ops(&["crop_blur"]), &registry).unwrap();
    let executor = ImageExecutor::new(plan, &registry, &OpConfig::default(), None).unwrap();

    let variants = executor.run(leaf_image()).unwrap();
    let names = variants.names();
    assert!(names.contains(&"crop_blur"));
    assert!(names.contains(&"remove_background"));
    assert!(names.contains(&"crop"));

    // The crop is resized to the canonical classifier input size.
    let crop = variants.get("crop").unwrap();
    assert_eq!(crop.width(), 256);
    assert_eq!(crop.height(), 256);
}

#[test]
fn full_chain_is_deterministic() {
    let registry = OpRegistry::standard();
    let plan = resolve(
        &ops(&["gaussian_blur", "veins", "crop_blur"]),
        &registry,
    )
    .unwrap();
    let executor = ImageExecutor::new(plan, &registry, &OpConfig::default(), None).unwrap();

    let first = executor.run(leaf_image()).unwrap();
    let second = executor.run(leaf_image()).unwrap();

    assert_eq!(first.names(), second.names());
    for (name, img) in first.iter() {
        assert_eq!(
            img.as_bytes(),
            second.get(name).unwrap().as_bytes(),
            "variant {name} differs between runs"
        );
    }
}

#[test]
fn unknown_operation_is_rejected_before_execution() {
    let err = resolve(&ops(&["mask", "sharpen"]), &OpRegistry::standard()).unwrap_err();
    assert!(err.to_string().contains("sharpen"));
    assert!(err.to_string().contains("rgb2lab"));
}
