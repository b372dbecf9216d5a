//! # Error Module
//!
//! Error types for the leaf transformation pipeline.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, operation names, what went wrong
//! - **Fail loudly on ordering bugs** - a missing context key means the
//!   dependency graph is wrong, not that a default should be invented
//! - **Isolate per-image failures** - one bad image must not abort a batch

use crate::core::context::Channel;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum LeafPipelineError {
    #[error("Operation resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Operation error: {0}")]
    Op(#[from] OpError),

    #[error("Image read error: {0}")]
    Read(#[from] ImageReadError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Discovery error: {0}")]
    Discover(#[from] DiscoverError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised while resolving requested operation names
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("'{name}' is not a valid operation. Available: {available}")]
    UnknownOperation { name: String, available: String },
}

/// Errors raised by an operation's `apply`
///
/// `MissingContextKey` indicates a dependency-graph or ordering bug: the
/// operation that should have produced the key never ran.
#[derive(Error, Debug)]
pub enum OpError {
    #[error("'{operation}' requires context produced by '{producer}', which has not run")]
    MissingContextKey {
        operation: &'static str,
        producer: &'static str,
    },

    #[error("'{operation}' must run before any other operation has touched the context")]
    MustRunFirst { operation: &'static str },

    #[error("mask for channel '{channel}' contains no foreground pixels")]
    EmptyMask { channel: Channel },
}

/// Errors raised while loading an image from disk
#[derive(Error, Debug)]
pub enum ImageReadError {
    #[error("Image not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to decode image {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
}

/// Errors raised while writing variants to the destination tree
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write image {path}: {reason}")]
    WriteImage { path: PathBuf, reason: String },

    #[error("Source path {path} has no parent folder to derive a class name from")]
    NoClassFolder { path: PathBuf },
}

/// Errors raised while discovering image paths
#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("Source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, LeafPipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_error_lists_available_ops() {
        let error = ResolveError::UnknownOperation {
            name: "sharpen".to_string(),
            available: "analyse, crop, mask".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("sharpen"));
        assert!(message.contains("analyse, crop, mask"));
    }

    #[test]
    fn missing_context_key_names_both_operations() {
        let error = OpError::MissingContextKey {
            operation: "mask",
            producer: "rgb2lab",
        };
        let message = error.to_string();
        assert!(message.contains("mask"));
        assert!(message.contains("rgb2lab"));
    }

    #[test]
    fn read_error_includes_path() {
        let error = ImageReadError::Unreadable {
            path: PathBuf::from("/leaves/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/leaves/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }
}
