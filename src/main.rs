//! # leaf-pipeline CLI
//!
//! Command-line interface for the leaf transformation pipeline.
//!
//! ## Usage
//! ```bash
//! leaf-pipeline single --path leaf1.jpg --ops crop_blur
//! leaf-pipeline multi --src images/ --dst out/ --workers 4
//! ```

mod cli;

use leaf_pipeline::Result;

fn main() -> Result<()> {
    cli::run()
}
