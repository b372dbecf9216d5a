//! # Variant Persistence
//!
//! Writes variants under `<dst>/<class>/<variant>/<filename>`, where
//! `<class>` is the source image's parent folder name and `<filename>`
//! keeps the source base name and extension. Directories are created on
//! demand; `create_dir_all` is a no-op when another worker got there
//! first, so concurrent writers are safe.

use crate::core::resolver::ExecutionPlan;
use crate::core::variants::{variant_for_request, VariantSet};
use crate::error::PersistError;
use std::path::{Path, PathBuf};

/// Which variants a run persists or displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Every extracted variant.
    All,
    /// Only the variant surfaced by the last requested operation.
    FinalOnly,
}

/// Writes a variant set into the destination tree.
#[derive(Clone)]
pub struct VariantWriter {
    root: PathBuf,
    mode: SaveMode,
}

impl VariantWriter {
    pub fn new(root: impl Into<PathBuf>, mode: SaveMode) -> Self {
        Self {
            root: root.into(),
            mode,
        }
    }

    /// The variant name `FinalOnly` mode keeps for this plan.
    fn final_variant(plan: &ExecutionPlan) -> Option<&'static str> {
        plan.requested()
            .last()
            .and_then(|name| variant_for_request(name))
    }

    /// Persist `variants` for `source`, returning the written paths.
    pub fn write(
        &self,
        source: &Path,
        variants: &VariantSet,
        plan: &ExecutionPlan,
    ) -> Result<Vec<PathBuf>, PersistError> {
        let class = source
            .parent()
            .and_then(|p| p.file_name())
            .ok_or_else(|| PersistError::NoClassFolder {
                path: source.to_path_buf(),
            })?
            .to_owned();
        let filename = source
            .file_name()
            .ok_or_else(|| PersistError::NoClassFolder {
                path: source.to_path_buf(),
            })?
            .to_owned();

        let keep_only = match self.mode {
            SaveMode::All => None,
            SaveMode::FinalOnly => Self::final_variant(plan),
        };

        let mut written = Vec::new();
        for (name, image) in variants.iter() {
            if matches!(keep_only, Some(keep) if keep != name) {
                continue;
            }

            let dir = self.root.join(&class).join(name);
            std::fs::create_dir_all(&dir).map_err(|source| PersistError::CreateDirectory {
                path: dir.clone(),
                source,
            })?;

            let path = dir.join(&filename);
            image.save(&path).map_err(|e| PersistError::WriteImage {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            written.push(path);
        }

        Ok(written)
    }
}
