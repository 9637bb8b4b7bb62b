//! The unified grid model
//!
//! One [`GridRecord`] per grid ID, holding every database ID and every
//! distinct geometry seen for that square across both sources.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::grid_id::GridId;

/// Everything known about one grid square
///
/// The containers are optional only so that a hand-edited or truncated model
/// snapshot can be represented; records built by the merger always have both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRecord {
    /// Database resource IDs, in first-seen order, no duplicates
    #[serde(rename = "uuid", default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,

    /// Distinct canonical coordinate strings, in first-seen order
    #[serde(rename = "coordinates", default, skip_serializing_if = "Option::is_none")]
    pub geometries: Option<Vec<String>>,

    /// First geometry taken from the reference source
    #[serde(
        rename = "canonical_coordinates",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub canonical_geometry: Option<String>,
}

impl Default for GridRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl GridRecord {
    /// Creates an empty record with both containers present
    pub fn new() -> Self {
        Self {
            ids: Some(Vec::new()),
            geometries: Some(Vec::new()),
            canonical_geometry: None,
        }
    }

    /// Adds a database ID unless empty or already present
    ///
    /// Returns true if the ID was added.
    pub fn add_id(&mut self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        let ids = self.ids.get_or_insert_with(Vec::new);
        if ids.iter().any(|existing| existing == id) {
            return false;
        }
        ids.push(id.to_string());
        true
    }

    /// Adds a geometry unless already present
    ///
    /// An empty string is a geometry like any other: a reference polygon whose
    /// tuples were all dropped still counts. Returns true if it was added.
    pub fn add_geometry(&mut self, geometry: &str) -> bool {
        let geometries = self.geometries.get_or_insert_with(Vec::new);
        if geometries.iter().any(|existing| existing == geometry) {
            return false;
        }
        geometries.push(geometry.to_string());
        true
    }

    /// Folds another record for the same square into this one
    ///
    /// Containers are unioned in order; the first canonical geometry is kept.
    pub fn absorb(&mut self, other: GridRecord) {
        if let Some(ids) = other.ids {
            union_into(self.ids.get_or_insert_with(Vec::new), ids);
        }
        if let Some(geometries) = other.geometries {
            union_into(self.geometries.get_or_insert_with(Vec::new), geometries);
        }
        if self.canonical_geometry.is_none() {
            self.canonical_geometry = other.canonical_geometry;
        }
    }

    /// Number of database IDs (0 if the container is absent)
    pub fn id_count(&self) -> usize {
        self.ids.as_ref().map_or(0, Vec::len)
    }

    /// Number of distinct geometries (0 if the container is absent)
    pub fn geometry_count(&self) -> usize {
        self.geometries.as_ref().map_or(0, Vec::len)
    }
}

fn union_into(target: &mut Vec<String>, values: Vec<String>) {
    for value in values {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}

/// The unified mapping from grid ID to record
///
/// Ordered by grid ID so that dumps are stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GridData {
    records: BTreeMap<GridId, GridRecord>,
}

// Keys differing only in case name the same square, so they are folded
// together rather than left to overwrite each other.
impl<'de> Deserialize<'de> for GridData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, GridRecord>::deserialize(deserializer)?;
        let mut data = GridData::new();
        for (name, record) in raw {
            let id = GridId::new(&name);
            match data.records.get_mut(&id) {
                Some(existing) => existing.absorb(record),
                None => {
                    data.records.insert(id, record);
                }
            }
        }
        Ok(data)
    }
}

impl GridData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for an ID, creating an empty one if needed
    pub fn entry(&mut self, id: GridId) -> &mut GridRecord {
        self.records.entry(id).or_default()
    }

    /// Inserts or replaces a record
    pub fn insert(&mut self, id: GridId, record: GridRecord) -> Option<GridRecord> {
        self.records.insert(id, record)
    }

    pub fn get(&self, id: &GridId) -> Option<&GridRecord> {
        self.records.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GridId, &GridRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_empty_containers() {
        let record = GridRecord::new();
        assert_eq!(record.ids, Some(vec![]));
        assert_eq!(record.geometries, Some(vec![]));
        assert!(record.canonical_geometry.is_none());
    }

    #[test]
    fn add_id_deduplicates() {
        let mut record = GridRecord::new();
        assert!(record.add_id("abc"));
        assert!(!record.add_id("abc"));
        assert!(!record.add_id(""));
        assert!(record.add_id("def"));
        assert_eq!(record.ids, Some(vec!["abc".to_string(), "def".to_string()]));
    }

    #[test]
    fn add_geometry_deduplicates_and_keeps_order() {
        let mut record = GridRecord::new();
        assert!(record.add_geometry("b"));
        assert!(record.add_geometry("a"));
        assert!(!record.add_geometry("b"));
        assert_eq!(record.geometries, Some(vec!["b".to_string(), "a".to_string()]));
        assert_eq!(record.geometry_count(), 2);
    }

    #[test]
    fn add_geometry_keeps_empty_string_once() {
        let mut record = GridRecord::new();
        assert!(record.add_geometry(""));
        assert!(!record.add_geometry(""));
        assert_eq!(record.geometries, Some(vec![String::new()]));
    }

    #[test]
    fn counts_treat_absent_as_zero() {
        let record = GridRecord {
            ids: None,
            geometries: None,
            canonical_geometry: None,
        };
        assert_eq!(record.id_count(), 0);
        assert_eq!(record.geometry_count(), 0);
    }

    #[test]
    fn entry_creates_once() {
        let mut data = GridData::new();
        data.entry(GridId::new("E01N02-03")).add_id("x");
        data.entry(GridId::new("e01n02-03")).add_id("y");

        assert_eq!(data.len(), 1);
        assert_eq!(data.get(&GridId::new("E01N02-03")).unwrap().id_count(), 2);
    }

    #[test]
    fn serializes_with_snapshot_field_names() {
        let mut data = GridData::new();
        let record = data.entry(GridId::new("E01N02-03"));
        record.add_id("abc");
        record.add_geometry("1.00,2.00,0.00");
        record.canonical_geometry = Some("1.00,2.00,0.00".to_string());

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "E01N02-03": {
                    "uuid": ["abc"],
                    "coordinates": ["1.00,2.00,0.00"],
                    "canonical_coordinates": "1.00,2.00,0.00"
                }
            })
        );
    }

    #[test]
    fn absorb_unions_containers() {
        let mut record = GridRecord {
            ids: None,
            geometries: Some(vec!["a".to_string()]),
            canonical_geometry: None,
        };
        record.absorb(GridRecord {
            ids: Some(vec!["x".to_string()]),
            geometries: Some(vec!["b".to_string(), "a".to_string()]),
            canonical_geometry: Some("b".to_string()),
        });

        assert_eq!(record.ids, Some(vec!["x".to_string()]));
        assert_eq!(record.geometries, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(record.canonical_geometry.as_deref(), Some("b"));
    }

    #[test]
    fn deserializing_folds_keys_differing_in_case() {
        let data: GridData = serde_json::from_str(
            r#"{
                "e01n02-03": {"uuid": ["id-2"], "coordinates": ["b"]},
                "E01N02-03": {"uuid": ["id-1"], "coordinates": ["a"], "canonical_coordinates": "a"}
            }"#,
        )
        .unwrap();

        assert_eq!(data.len(), 1);
        let record = data.get(&GridId::new("E01N02-03")).unwrap();
        assert_eq!(record.ids, Some(vec!["id-1".to_string(), "id-2".to_string()]));
        assert_eq!(record.geometries, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(record.canonical_geometry.as_deref(), Some("a"));
    }

    #[test]
    fn deserializes_missing_containers_as_absent() {
        let data: GridData =
            serde_json::from_str(r#"{"E01N02-03": {"coordinates": []}}"#).unwrap();
        let record = data.get(&GridId::new("E01N02-03")).unwrap();
        assert!(record.ids.is_none());
        assert_eq!(record.geometries, Some(vec![]));
    }
}
