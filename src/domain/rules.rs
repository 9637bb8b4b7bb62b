//! Consistency rules for the unified grid model
//!
//! | Rule | Severity | Stops further checks |
//! |------|----------|----------------------|
//! | ID does not match the grid pattern | error | yes |
//! | No ID container | error | yes |
//! | No geometry container | error | yes |
//! | No database ID | warning | no |
//! | More than one database ID | error | no |
//! | No geometry | warning | no |
//! | Exactly one geometry | warning | no |
//! | More than two geometries | error | no |
//!
//! Two geometries (one per source, typically mirror-image windings) pass
//! silently.

use std::fmt;

use serde::Serialize;

use super::grid_id::GridId;
use super::record::{GridData, GridRecord};

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// What a rule found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum FindingKind {
    InvalidGridId,
    NoIdContainer,
    NoGeometryContainer,
    MissingFromDatabase,
    DuplicatedInDatabase,
    NoGeometry,
    // Fires on a single geometry; the message wording is kept as users know it.
    SingleGeometry,
    TooManyGeometries(usize),
}

impl FindingKind {
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::MissingFromDatabase
            | FindingKind::NoGeometry
            | FindingKind::SingleGeometry => Severity::Warning,
            FindingKind::InvalidGridId
            | FindingKind::NoIdContainer
            | FindingKind::NoGeometryContainer
            | FindingKind::DuplicatedInDatabase
            | FindingKind::TooManyGeometries(_) => Severity::Error,
        }
    }
}

/// A single rule violation for one grid square
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub grid_id: GridId,
    #[serde(flatten)]
    pub kind: FindingKind,
}

impl Finding {
    pub fn new(grid_id: GridId, kind: FindingKind) -> Self {
        Self { grid_id, kind }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = &self.grid_id;
        match self.kind {
            FindingKind::InvalidGridId => write!(f, "{} is not a valid grid ID", id),
            FindingKind::NoIdContainer => write!(f, "{} has no UUID values", id),
            FindingKind::NoGeometryContainer => write!(f, "{} has no coordinate values", id),
            FindingKind::MissingFromDatabase => write!(f, "{} has no entry in the database", id),
            FindingKind::DuplicatedInDatabase => write!(f, "{} is duplicated in the database", id),
            FindingKind::NoGeometry => write!(f, "{} has no geometry", id),
            FindingKind::SingleGeometry => write!(
                f,
                "{} has two different geometries (may be OK if they're simply inverses of each other)",
                id
            ),
            FindingKind::TooManyGeometries(n) => write!(f, "{} has {} different geometries", id, n),
        }
    }
}

/// Sorted warning and error messages from one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Summary {
    /// Builds a summary from findings, sorting each list
    pub fn from_findings<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        let mut summary = Self::default();
        for finding in findings {
            match finding.severity() {
                Severity::Warning => summary.warnings.push(finding.to_string()),
                Severity::Error => summary.errors.push(finding.to_string()),
            }
        }
        summary.warnings.sort();
        summary.errors.sort();
        summary
    }

    /// Returns true if nothing was found
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Runs every rule against one record
pub fn check_record(grid_id: &GridId, record: &GridRecord) -> Vec<Finding> {
    let finding = |kind| Finding::new(grid_id.clone(), kind);

    if !grid_id.is_valid() {
        return vec![finding(FindingKind::InvalidGridId)];
    }
    let Some(ids) = &record.ids else {
        return vec![finding(FindingKind::NoIdContainer)];
    };
    let Some(geometries) = &record.geometries else {
        return vec![finding(FindingKind::NoGeometryContainer)];
    };

    let mut findings = Vec::new();

    match ids.len() {
        0 => findings.push(finding(FindingKind::MissingFromDatabase)),
        1 => {}
        _ => findings.push(finding(FindingKind::DuplicatedInDatabase)),
    }

    match geometries.len() {
        0 => findings.push(finding(FindingKind::NoGeometry)),
        1 => findings.push(finding(FindingKind::SingleGeometry)),
        2 => {}
        n => findings.push(finding(FindingKind::TooManyGeometries(n))),
    }

    findings
}

/// Runs every rule against the whole model, in grid ID order
pub fn findings(data: &GridData) -> Vec<Finding> {
    data.iter()
        .flat_map(|(id, record)| check_record(id, record))
        .collect()
}

/// Evaluates the model and returns sorted warning and error messages
pub fn evaluate(data: &GridData) -> Summary {
    Summary::from_findings(&findings(data))
}
