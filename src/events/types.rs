//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the transformation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Batch processing events
    Batch(BatchEvent),
}

/// Events during batch processing
///
/// Only the *count* of per-image events is meaningful for progress: task
/// consumption order across workers is unspecified, so completion order is
/// too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BatchEvent {
    /// The batch has started
    Started { total_images: usize },
    /// An image was fully processed and persisted
    ImageCompleted { path: PathBuf },
    /// An image failed; the batch continues
    ImageFailed { path: PathBuf, message: String },
    /// The batch finished
    Completed { processed: usize, failed: usize },
}
