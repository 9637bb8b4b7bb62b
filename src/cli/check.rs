//! Check commands (check, dump, evaluate)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use super::output::Output;
use crate::domain::{findings, GridData, Merger, Summary};
use crate::storage::{read_export, read_kml, read_model, Config};

/// Input sources shared by `check` and `dump`
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Grid square export in JSON format (export_business_data -f json)
    #[arg(long, short = 'e')]
    pub export: Option<PathBuf>,

    /// Grid square reference in KML format
    #[arg(long, short = 'k')]
    pub kml: Option<PathBuf>,

    /// Tile data key holding grid square geometry in the export
    #[arg(long, env = "GRID_CHECK_LAYER_KEY")]
    pub layer_key: Option<String>,
}

/// Merges both sources and reports problems
pub fn check(output: &Output, config: &Config, sources: &SourceArgs) -> Result<()> {
    let data = build_model(output, config, sources)?;
    report(output, &data)
}

/// Merges both sources and prints the unified model
pub fn dump(output: &Output, config: &Config, sources: &SourceArgs) -> Result<()> {
    let data = build_model(output, config, sources)?;
    output.data(&data);
    Ok(())
}

/// Reports problems in a previously dumped model
pub fn evaluate(output: &Output, model: &Path) -> Result<()> {
    output.verbose_ctx("evaluate", &format!("Reading model: {}", model.display()));
    let data = read_model(model)?;
    report(output, &data)
}

/// Loads whichever sources were given and merges them, reference first
fn build_model(output: &Output, config: &Config, sources: &SourceArgs) -> Result<GridData> {
    let config = config.clone().with_layer_key(sources.layer_key.clone())?;
    output.verbose_ctx(
        "merge",
        &format!("Using geometry layer key: {}", config.geometry_layer_key),
    );

    let mut merger = Merger::new(config.geometry_layer_key);

    if let Some(path) = &sources.kml {
        output.verbose_ctx("kml", &format!("Reading reference: {}", path.display()));
        let reference = read_kml(path)?;
        output.verbose_ctx("kml", &format!("Found {} placemarks", reference.placemarks.len()));

        merger
            .merge_reference(&reference)
            .with_context(|| format!("Invalid coordinates in {}", path.display()))?;
    }

    if let Some(path) = &sources.export {
        output.verbose_ctx("export", &format!("Reading export: {}", path.display()));
        let export = read_export(path)?;
        output.verbose_ctx("export", &format!("Found {} resources", export.resources().len()));

        merger
            .merge_export(&export)
            .with_context(|| format!("Invalid geometry in {}", path.display()))?;
    }

    let (data, stats) = merger.finish();
    output.verbose_ctx(
        "merge",
        &format!(
            "Placemarks: {} merged, {} without coordinates",
            stats.placemarks_merged, stats.placemarks_skipped
        ),
    );
    output.verbose_ctx(
        "merge",
        &format!(
            "Resources: {} merged, {} unnamed; features: {} merged, {} without geometry",
            stats.resources_merged,
            stats.resources_skipped,
            stats.features_merged,
            stats.features_skipped
        ),
    );
    output.verbose_ctx("merge", &format!("Model has {} grid squares", data.len()));

    Ok(data)
}

/// Runs the rules and prints the result; fails if any error was found
fn report(output: &Output, data: &GridData) -> Result<()> {
    let findings = findings(data);
    let summary = Summary::from_findings(&findings);
    output.verbose_ctx(
        "rules",
        &format!("Evaluated {} grid squares, {} findings", data.len(), findings.len()),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "warnings": &summary.warnings,
            "errors": &summary.errors,
            "findings": &findings,
        }));
    } else {
        output.report(&summary);
    }

    if summary.has_errors() {
        anyhow::bail!("{} error(s) found", summary.errors.len());
    }

    Ok(())
}
