//! Database export reader
//!
//! The export is a business-data JSON document. Only the envelope is typed;
//! tile data stays as raw JSON because its keys are node IDs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::ExportDocument;

/// Reads and parses an export file
pub fn read_export(path: &Path) -> Result<ExportDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read export file: {}", path.display()))?;

    parse_export(&content).with_context(|| format!("Failed to parse export file: {}", path.display()))
}

/// Parses export JSON text
pub fn parse_export(json: &str) -> Result<ExportDocument> {
    serde_json::from_str(json).context("Invalid export JSON")
}
