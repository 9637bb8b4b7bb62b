//! Parsed source documents
//!
//! These are the trees the merger consumes. Reading them from disk lives in
//! the storage layer; here they are plain data.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A placemark from the reference KML
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placemark {
    /// The placemark's `<name>` text, as written
    pub name: String,

    /// Every `<coordinates>` text found inside the placemark, in document order
    pub coordinates: Vec<String>,
}

impl Placemark {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinates: Vec::new(),
        }
    }

    /// Adds a coordinates block
    pub fn with_coordinates(mut self, coordinates: impl Into<String>) -> Self {
        self.coordinates.push(coordinates.into());
        self
    }

    /// Returns the first non-blank coordinates block, trimmed
    pub fn primary_coordinates(&self) -> Option<&str> {
        self.coordinates
            .iter()
            .map(|c| c.trim())
            .find(|c| !c.is_empty())
    }
}

/// The reference KML, reduced to its placemarks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceDocument {
    pub placemarks: Vec<Placemark>,
}

/// A database export in business-data JSON format
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportDocument {
    #[serde(default)]
    pub business_data: Option<BusinessData>,
}

impl ExportDocument {
    /// Returns the exported resources, or an empty slice if there are none
    pub fn resources(&self) -> &[Resource] {
        self.business_data
            .as_ref()
            .map(|b| b.resources.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessData {
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// One exported resource instance with its tiles
#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    pub resourceinstance: ResourceInstance,

    #[serde(default)]
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceInstance {
    /// Usually a UUID string, but any JSON value is accepted
    pub resourceinstanceid: Value,

    /// A string, a localized mapping such as `{"en": "..."}`, or absent
    #[serde(default)]
    pub name: Value,
}

impl ResourceInstance {
    /// Returns the instance ID as text (empty for `null`)
    pub fn id_text(&self) -> String {
        match &self.resourceinstanceid {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Resolves the display name: a plain string, or the `en` entry of a
    /// localized mapping, otherwise empty
    pub fn resolved_name(&self) -> &str {
        match &self.name {
            Value::String(s) => s,
            Value::Object(map) => map.get("en").and_then(Value::as_str).unwrap_or(""),
            _ => "",
        }
    }
}

/// A tile of resource data, keyed by node ID
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tile {
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

impl Tile {
    /// Returns the feature list stored under the given geometry layer key
    pub fn features(&self, layer_key: &str) -> &[Value] {
        self.data
            .as_ref()
            .and_then(|data| data.get(layer_key))
            .and_then(|layer| layer.get("features"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn instance(value: Value) -> ResourceInstance {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn resolved_name_variants() {
        let plain = instance(json!({"resourceinstanceid": "a", "name": "e01n02-03"}));
        assert_eq!(plain.resolved_name(), "e01n02-03");

        let localized = instance(json!({"resourceinstanceid": "a", "name": {"en": "E01N02-03", "ar": "x"}}));
        assert_eq!(localized.resolved_name(), "E01N02-03");

        let no_en = instance(json!({"resourceinstanceid": "a", "name": {"ar": "x"}}));
        assert_eq!(no_en.resolved_name(), "");

        let en_not_string = instance(json!({"resourceinstanceid": "a", "name": {"en": 5}}));
        assert_eq!(en_not_string.resolved_name(), "");

        let missing = instance(json!({"resourceinstanceid": "a"}));
        assert_eq!(missing.resolved_name(), "");

        let number = instance(json!({"resourceinstanceid": "a", "name": 12}));
        assert_eq!(number.resolved_name(), "");
    }

    #[test]
    fn id_text_variants() {
        assert_eq!(instance(json!({"resourceinstanceid": "abc-123"})).id_text(), "abc-123");
        assert_eq!(instance(json!({"resourceinstanceid": 42})).id_text(), "42");
        assert_eq!(instance(json!({"resourceinstanceid": null})).id_text(), "");
    }

    #[test]
    fn instance_requires_id() {
        let result: Result<ResourceInstance, _> = serde_json::from_value(json!({"name": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn export_without_business_data_has_no_resources() {
        let doc: ExportDocument = serde_json::from_value(json!({})).unwrap();
        assert!(doc.resources().is_empty());

        let doc: ExportDocument = serde_json::from_value(json!({"business_data": {}})).unwrap();
        assert!(doc.resources().is_empty());
    }

    #[test]
    fn tile_features_lookup() {
        let tile: Tile = serde_json::from_value(json!({
            "data": {
                "layer": {"features": [{"geometry": {"coordinates": [[1, 2]]}}]},
                "other": {"features": []}
            }
        }))
        .unwrap();

        assert_eq!(tile.features("layer").len(), 1);
        assert!(tile.features("other").is_empty());
        assert!(tile.features("missing").is_empty());

        let bare: Tile = serde_json::from_value(json!({})).unwrap();
        assert!(bare.features("layer").is_empty());

        let null_layer: Tile = serde_json::from_value(json!({"data": {"layer": null}})).unwrap();
        assert!(null_layer.features("layer").is_empty());
    }

    #[test]
    fn placemark_primary_coordinates_skips_blank() {
        let placemark = Placemark::new("E01N02-03")
            .with_coordinates("   ")
            .with_coordinates(" 1,2,0 ")
            .with_coordinates("3,4,0");
        assert_eq!(placemark.primary_coordinates(), Some("1,2,0"));

        assert_eq!(Placemark::new("x").primary_coordinates(), None);
    }
}
