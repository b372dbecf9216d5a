//! # Leaf Pipeline
//!
//! Turns raw leaf photographs into the derived image variants (masks,
//! crops, vein maps, ...) a downstream classifier trains on.
//!
//! ## Architecture
//! The library is split into a core engine (GUI-agnostic) and presentation
//! layers:
//! - `core` - registry, dependency resolver, operations, executor, pool
//! - `events` - event-driven progress reporting (GUI-ready)
//! - `error` - structured error types
//! - `cli` - command-line interface (in the binary)
//!
//! ## Flow
//! A requested operation list is expanded through the alias table and
//! ordered dependency-first; each worker builds its own operation sequence
//! once, then consumes image paths from a shared queue, threading a fresh
//! per-image context through the sequence and persisting the extracted
//! variants.

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{LeafPipelineError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
