//! # Core Module
//!
//! The GUI-agnostic transformation engine.
//!
//! ## Modules
//! - `registry` - named operation factories, populated once at startup
//! - `resolver` - alias expansion and dependency-first ordering
//! - `ops` - the operations themselves
//! - `context` - per-image state threaded through an operation sequence
//! - `imaging` - the numerical primitives operations orchestrate
//! - `variants` - derives the presentable variant set from a context
//! - `executor` - drives one image through a resolved plan
//! - `pool` - fans paths out to workers and results back
//! - `discover` - collects image paths from a source tree
//! - `persist` - writes variants into the destination layout
//! - `montage` - composites variants into a single grid image

pub mod context;
pub mod discover;
pub mod executor;
pub mod imaging;
pub mod montage;
pub mod ops;
pub mod persist;
pub mod pool;
pub mod registry;
pub mod resolver;
pub mod variants;

// Re-export commonly used types
pub use context::{Channel, ChannelMap, Context, ShapeMeasurements};
pub use executor::ImageExecutor;
pub use ops::Operation;
pub use persist::{SaveMode, VariantWriter};
pub use pool::{BatchReport, PoolConfig};
pub use registry::{OpConfig, OpRegistry};
pub use resolver::{resolve, ExecutionPlan};
pub use variants::VariantSet;
