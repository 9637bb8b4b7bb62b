//! # Storage Layer
//!
//! Reading the checker's inputs from disk.
//!
//! ## Input Formats
//!
//! | Data | Format | Reader |
//! |------|--------|--------|
//! | Reference grid | KML (`<Placemark>` with `<name>` and `<coordinates>`) | [`read_kml`] |
//! | Database export | Business-data JSON | [`read_export`] |
//! | Model snapshot | JSON keyed by grid ID (output of `dump`) | [`read_model`] |
//! | Config | TOML | [`Config`] |
//!
//! Readers attach the file path to every error. Nothing here writes files.

mod config;
mod export;
mod kml;
mod snapshot;

pub use config::{Config, ConfigError, OutputFormat, DEFAULT_GEOMETRY_LAYER_KEY};
pub use export::{parse_export, read_export};
pub use kml::{parse_kml, read_kml, KmlError};
pub use snapshot::read_model;
