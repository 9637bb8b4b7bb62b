//! Coordinate normalization
//!
//! The two sources encode polygons differently:
//! - KML: a plain string of `x,y[,z]` tuples separated by whitespace
//! - Database export: GeoJSON-style nested arrays of `[x, y]` pairs
//!
//! Both are reduced to the canonical form `x,y,z x,y,z ...` with every
//! component rendered to two decimals, so geometries from either side can be
//! compared by plain string equality.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Invalid coordinate value '{value}' in '{token}'")]
    InvalidNumber { token: String, value: String },

    #[error("Geometry coordinates must be nested arrays of numbers, found: {0}")]
    NotAnArray(String),
}

/// Flattens nested coordinate arrays into a coordinate string
///
/// Every innermost array of numbers is one point. Points with two components
/// get `z = 0`; other points are emitted unchanged and left for
/// [`normalize_coordinate_string`] to keep or drop. Nesting depth does not
/// matter, so rings and multi-ring polygons flatten the same way.
///
/// ```
/// use grid_square_checker::domain::flatten_nested_coordinates;
///
/// let coords = serde_json::json!([[[1, 2], [3.5, 4], [1, 2]]]);
/// assert_eq!(flatten_nested_coordinates(&coords).unwrap(), "1,2,0 3.5,4,0 1,2,0");
/// ```
pub fn flatten_nested_coordinates(value: &Value) -> Result<String, CoordinateError> {
    let mut points = Vec::new();
    collect_points(value, &mut points)?;
    Ok(points.join(" "))
}

fn collect_points(value: &Value, points: &mut Vec<String>) -> Result<(), CoordinateError> {
    match value {
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_number) => {
            let mut components: Vec<String> = items.iter().map(Value::to_string).collect();
            if components.len() == 2 {
                components.push("0".to_string());
            }
            points.push(components.join(","));
        }
        Value::Array(items) => {
            for item in items {
                collect_points(item, points)?;
            }
        }
        other => return Err(CoordinateError::NotAnArray(other.to_string())),
    }
    Ok(())
}

/// Normalizes a whitespace-separated coordinate string to canonical form
///
/// Two-component tuples get `z = 0`. Tuples that still don't have exactly
/// three components are dropped. A component that is not a number fails the
/// whole call.
pub fn normalize_coordinate_string(raw: &str) -> Result<String, CoordinateError> {
    let mut tokens = Vec::new();

    for token in raw.split_whitespace() {
        let mut components: Vec<&str> = token.split(',').collect();
        if components.len() == 2 {
            components.push("0");
        }
        if components.len() != 3 {
            continue;
        }

        let rendered = components
            .iter()
            .map(|c| parse_component(token, c).map(|v| format!("{:.2}", v)))
            .collect::<Result<Vec<_>, _>>()?;

        tokens.push(rendered.join(","));
    }

    Ok(tokens.join(" "))
}

fn parse_component(token: &str, component: &str) -> Result<f64, CoordinateError> {
    component
        .trim()
        .parse::<f64>()
        .map_err(|_| CoordinateError::InvalidNumber {
            token: token.to_string(),
            value: component.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn normalize_pads_missing_z() {
        assert_eq!(
            normalize_coordinate_string("1,2 3.456,4.1").unwrap(),
            "1.00,2.00,0.00 3.46,4.10,0.00"
        );
    }

    #[test]
    fn normalize_keeps_three_components() {
        assert_eq!(
            normalize_coordinate_string("35.5,31.25,100").unwrap(),
            "35.50,31.25,100.00"
        );
    }

    #[test]
    fn normalize_drops_bad_arity_tokens() {
        assert_eq!(normalize_coordinate_string("1 2,3 4,5,6,7").unwrap(), "2.00,3.00,0.00");
        assert_eq!(normalize_coordinate_string("1,2,3,4").unwrap(), "");
    }

    #[test]
    fn normalize_handles_kml_whitespace() {
        let raw = "\n    35,31,0\n\t36,31,0   36,32,0\n  ";
        assert_eq!(
            normalize_coordinate_string(raw).unwrap(),
            "35.00,31.00,0.00 36.00,31.00,0.00 36.00,32.00,0.00"
        );
    }

    #[test]
    fn normalize_empty_input() {
        assert_eq!(normalize_coordinate_string("").unwrap(), "");
        assert_eq!(normalize_coordinate_string("   ").unwrap(), "");
    }

    #[test]
    fn normalize_rejects_non_numeric() {
        let err = normalize_coordinate_string("1,2,0 a,b,0").unwrap_err();
        assert_eq!(
            err,
            CoordinateError::InvalidNumber {
                token: "a,b,0".to_string(),
                value: "a".to_string(),
            }
        );
    }

    #[test]
    fn normalize_negative_values() {
        assert_eq!(
            normalize_coordinate_string("-1.005,-0.5").unwrap(),
            "-1.00,-0.50,0.00"
        );
    }

    #[test]
    fn flatten_ring() {
        let coords = json!([[1, 2], [3, 4], [1, 2]]);
        assert_eq!(flatten_nested_coordinates(&coords).unwrap(), "1,2,0 3,4,0 1,2,0");
    }

    #[test]
    fn flatten_then_normalize_ring() {
        let coords = json!([[1, 2], [3, 4], [1, 2]]);
        let flat = flatten_nested_coordinates(&coords).unwrap();
        assert_eq!(
            normalize_coordinate_string(&flat).unwrap(),
            "1.00,2.00,0.00 3.00,4.00,0.00 1.00,2.00,0.00"
        );
    }

    #[test]
    fn flatten_polygon_with_float_values() {
        let coords = json!([[[35.0, 31.0], [36.0, 31.0], [36.0, 32.0], [35.0, 31.0]]]);
        let flat = flatten_nested_coordinates(&coords).unwrap();
        assert_eq!(
            normalize_coordinate_string(&flat).unwrap(),
            "35.00,31.00,0.00 36.00,31.00,0.00 36.00,32.00,0.00 35.00,31.00,0.00"
        );
    }

    #[test]
    fn flatten_multiple_rings_in_order() {
        let coords = json!([[[1, 1], [2, 2]], [[3, 3]]]);
        assert_eq!(flatten_nested_coordinates(&coords).unwrap(), "1,1,0 2,2,0 3,3,0");
    }

    #[test]
    fn flatten_three_dimensional_point_is_kept() {
        // z is only appended to 2D points; appending it unconditionally would
        // make this a 4-component tuple and the normalizer would drop it.
        let coords = json!([[1, 2, 5]]);
        let flat = flatten_nested_coordinates(&coords).unwrap();
        assert_eq!(normalize_coordinate_string(&flat).unwrap(), "1.00,2.00,5.00");
    }

    #[test]
    fn flatten_empty_array() {
        assert_eq!(flatten_nested_coordinates(&json!([])).unwrap(), "");
        assert_eq!(flatten_nested_coordinates(&json!([[]])).unwrap(), "");
    }

    #[test]
    fn flatten_rejects_non_numeric_leaves() {
        assert!(matches!(
            flatten_nested_coordinates(&json!([["1", "2"]])),
            Err(CoordinateError::NotAnArray(_))
        ));
        assert!(matches!(
            flatten_nested_coordinates(&json!(null)),
            Err(CoordinateError::NotAnArray(_))
        ));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(
            points in prop::collection::vec(
                (-1.0e6f64..1.0e6, -1.0e6f64..1.0e6, prop::option::of(-1.0e4f64..1.0e4)),
                0..20,
            )
        ) {
            let raw = points
                .iter()
                .map(|(x, y, z)| match z {
                    Some(z) => format!("{},{},{}", x, y, z),
                    None => format!("{},{}", x, y),
                })
                .collect::<Vec<_>>()
                .join(" ");

            let once = normalize_coordinate_string(&raw).unwrap();
            let twice = normalize_coordinate_string(&once).unwrap();
            prop_assert_eq!(&once, &twice);

            for token in once.split(' ').filter(|t| !t.is_empty()) {
                let components: Vec<&str> = token.split(',').collect();
                prop_assert_eq!(components.len(), 3);
                for c in components {
                    let decimals = c.rsplit('.').next().unwrap();
                    prop_assert_eq!(decimals.len(), 2);
                }
            }
        }

        #[test]
        fn normalize_drops_wrong_arity(count in prop_oneof![Just(1usize), 4usize..8]) {
            let token = vec!["1.5"; count].join(",");
            prop_assert_eq!(normalize_coordinate_string(&token).unwrap(), "");
        }
    }
}
