//! Grid square identifiers
//!
//! ID Format: `{E|W}{2-digit}{N|S}{2-digit}-{2-digit}` (e.g., `E01N02-03`)
//!
//! IDs are uppercased on construction but never rejected: a malformed ID is
//! carried through the merge and only reported when the rules run.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

fn grid_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[EW][0-9]{2}[NS][0-9]{2}-[0-9]{2}$").expect("grid ID regex must compile")
    })
}

/// Identifier of a grid square, used as the key shared by both sources
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GridId(String);

impl<'de> Deserialize<'de> for GridId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

impl GridId {
    /// Creates an ID from a raw name, normalizing it to uppercase
    pub fn new(name: &str) -> Self {
        Self(name.to_uppercase())
    }

    /// Returns the ID text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the ID is empty (unnamed source entry)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the ID matches the grid square pattern
    pub fn is_valid(&self) -> bool {
        grid_id_re().is_match(&self.0)
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GridId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
