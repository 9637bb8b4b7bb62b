//! Merging both sources into the unified grid model
//!
//! The reference KML is merged first and seeds each square's canonical
//! geometry. The database export is merged second and contributes resource
//! IDs plus any geometry stored under the configured layer key. Geometry is
//! normalized before it is compared, so the same polygon from both sources
//! collapses into one entry.

use serde::Serialize;
use serde_json::Value;

use super::coords::{flatten_nested_coordinates, normalize_coordinate_string, CoordinateError};
use super::grid_id::GridId;
use super::record::GridData;
use super::source::{ExportDocument, ReferenceDocument};

/// Counters describing what a merge did with its input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Placemarks whose coordinates were normalized into a record
    pub placemarks_merged: usize,

    /// Placemarks without any coordinates
    pub placemarks_skipped: usize,

    /// Resources merged into a grid record
    pub resources_merged: usize,

    /// Resources skipped because their name resolved to nothing
    pub resources_skipped: usize,

    /// Features that yielded a non-empty geometry
    pub features_merged: usize,

    /// Features without geometry, or whose geometry normalized to nothing
    pub features_skipped: usize,
}

/// Builds a [`GridData`] from the reference and export documents
///
/// # Example
///
/// ```
/// use grid_square_checker::domain::{Merger, Placemark, ReferenceDocument};
///
/// let reference = ReferenceDocument {
///     placemarks: vec![Placemark::new("e01n02-03").with_coordinates("1,2 3,4")],
/// };
///
/// let mut merger = Merger::new("layer-key");
/// merger.merge_reference(&reference).unwrap();
/// let (data, _stats) = merger.finish();
///
/// assert_eq!(data.len(), 1);
/// ```
#[derive(Debug)]
pub struct Merger {
    layer_key: String,
    data: GridData,
    stats: MergeStats,
}

impl Merger {
    /// Creates a merger that reads export geometry from `layer_key`
    pub fn new(layer_key: impl Into<String>) -> Self {
        Self {
            layer_key: layer_key.into(),
            data: GridData::new(),
            stats: MergeStats::default(),
        }
    }

    /// Returns the geometry layer key in use
    pub fn layer_key(&self) -> &str {
        &self.layer_key
    }

    /// Merges the placemarks of a reference document
    pub fn merge_reference(&mut self, reference: &ReferenceDocument) -> Result<(), CoordinateError> {
        for placemark in &reference.placemarks {
            let Some(raw) = placemark.primary_coordinates() else {
                self.stats.placemarks_skipped += 1;
                continue;
            };

            let geometry = normalize_coordinate_string(raw)?;
            let record = self.data.entry(GridId::new(&placemark.name));

            if record.add_geometry(&geometry) && record.geometry_count() == 1 {
                record.canonical_geometry = Some(geometry);
            }
            self.stats.placemarks_merged += 1;
        }

        Ok(())
    }

    /// Merges the resources of a database export
    pub fn merge_export(&mut self, export: &ExportDocument) -> Result<(), CoordinateError> {
        for resource in export.resources() {
            let instance = &resource.resourceinstance;
            let grid_id = GridId::new(instance.resolved_name());
            if grid_id.is_empty() {
                self.stats.resources_skipped += 1;
                continue;
            }

            let record = self.data.entry(grid_id);
            record.add_id(&instance.id_text());

            for tile in &resource.tiles {
                for feature in tile.features(&self.layer_key) {
                    let Some(coordinates) = feature_coordinates(feature) else {
                        self.stats.features_skipped += 1;
                        continue;
                    };

                    let geometry = normalize_coordinate_string(&flatten_nested_coordinates(coordinates)?)?;
                    if geometry.is_empty() {
                        self.stats.features_skipped += 1;
                        continue;
                    }

                    record.add_geometry(&geometry);
                    self.stats.features_merged += 1;
                }
            }
            self.stats.resources_merged += 1;
        }

        Ok(())
    }

    /// Returns the merged model and the counters
    pub fn finish(self) -> (GridData, MergeStats) {
        (self.data, self.stats)
    }
}

fn feature_coordinates(feature: &Value) -> Option<&Value> {
    feature.get("geometry")?.get("coordinates")
}
