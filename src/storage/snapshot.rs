//! Model snapshots
//!
//! A snapshot is the unified model as printed by `dump`: a JSON object keyed
//! by grid ID with `uuid`, `coordinates` and `canonical_coordinates` fields.
//! Loading one lets the rules run again without the original sources.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::GridData;

/// Reads a model snapshot file
pub fn read_model(path: &Path) -> Result<GridData> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse model file: {}", path.display()))
}
