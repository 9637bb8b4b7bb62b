//! grid-square-checker - Consistency checks for grid square datasets
//!
//! Grid squares exist in two places: a reference KML file holding the
//! expected boundary of every square, and a database export holding what is
//! actually recorded against each square. This crate normalizes geometry from
//! both sources into one comparable form, merges them per grid ID, and runs a
//! fixed set of rules that report warnings and errors.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{evaluate, GridData, GridId, GridRecord, Merger, Summary};
