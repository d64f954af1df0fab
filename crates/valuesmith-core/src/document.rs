//! Loading and rewriting a chart's `values.yaml`

use std::path::Path;

use crate::assemble::ValueOverride;
use crate::error::{CoreError, Result};
use crate::tree::{Mapping, ValueTree};

/// File name of a chart's default values document
pub const VALUES_FILE: &str = "values.yaml";

/// Load a values document whose root must be a mapping
///
/// An empty document loads as an empty mapping.
pub fn load_document(path: &Path) -> Result<Mapping> {
    match ValueTree::from_file(path)? {
        ValueTree::Mapping(map) => Ok(map),
        tree if tree.is_empty() => Ok(Mapping::new()),
        _ => Err(CoreError::DocumentShape {
            path: path.display().to_string(),
        }),
    }
}

/// Write a mapping as YAML, replacing the file
pub fn save_document(path: &Path, document: &Mapping) -> Result<()> {
    let content = serde_yaml::to_string(document)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Merge the plain overrides into `<chart_dir>/values.yaml` and write it back
///
/// Returns `false` without touching anything when the chart has no values
/// document or there are no plain overrides.
pub fn rewrite_values_file(chart_dir: &Path, values: &ValueOverride) -> Result<bool> {
    let path = chart_dir.join(VALUES_FILE);
    if !path.exists() {
        tracing::debug!(chart = %chart_dir.display(), "no values document to rewrite");
        return Ok(false);
    }

    let base = load_document(&path)?;
    let Some(merged) = values.merge_into(base)? else {
        return Ok(false);
    };

    save_document(&path, &merged)?;
    tracing::info!(path = %path.display(), "rewrote values document with overrides");
    Ok(true)
}
