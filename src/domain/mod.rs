//! Domain models for grid square checking
//!
//! Contains the reconciliation logic without any I/O concerns: coordinate
//! normalization, merging both sources into one model, and the rule set.

mod coords;
mod grid_id;
mod merge;
mod record;
mod rules;
mod source;

pub use coords::{flatten_nested_coordinates, normalize_coordinate_string, CoordinateError};
pub use grid_id::GridId;
pub use merge::{MergeStats, Merger};
pub use record::{GridData, GridRecord};
pub use rules::{check_record, evaluate, findings, Finding, FindingKind, Severity, Summary};
pub use source::{BusinessData, ExportDocument, Placemark, ReferenceDocument, Resource, ResourceInstance, Tile};
