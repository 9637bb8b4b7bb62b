//! Reference KML reader
//!
//! Streams the document with quick-xml and keeps only what the merger needs:
//! each `<Placemark>`'s `<name>` and the text of every `<coordinates>` element
//! inside it. Element names are matched on their local part, so prefixed
//! documents (`<kml:Placemark>`) read the same as plain ones.
//!
//! Character references and the predefined XML entities are resolved inside
//! captured text; any other entity is rejected.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::domain::{Placemark, ReferenceDocument};

#[derive(Debug, Error, PartialEq)]
pub enum KmlError {
    #[error("Malformed KML {0}")]
    Malformed(String),

    #[error("Placemark #{0} has no name")]
    MissingName(usize),

    #[error("Unsupported entity reference '&{0};'")]
    UnknownEntity(String),
}

/// Which element's text is being collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Name,
    Coordinates,
}

/// Placemark under construction
#[derive(Debug, Default)]
struct OpenPlacemark {
    depth: usize,
    name: Option<String>,
    coordinates: Vec<String>,
}

impl OpenPlacemark {
    fn close(self, index: usize) -> Result<Placemark, KmlError> {
        let name = self.name.ok_or(KmlError::MissingName(index))?;
        Ok(Placemark {
            name,
            coordinates: self.coordinates,
        })
    }
}

/// Reads and parses a KML file
pub fn read_kml(path: &Path) -> Result<ReferenceDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read KML file: {}", path.display()))?;

    parse_kml(&content).with_context(|| format!("Failed to parse KML file: {}", path.display()))
}

/// Parses KML text into its placemarks, in document order
pub fn parse_kml(xml: &str) -> Result<ReferenceDocument, KmlError> {
    // Text is trimmed once per element on close; trimming each event would
    // eat the spaces around entity references.
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut placemarks = Vec::new();
    let mut open: Option<OpenPlacemark> = None;
    let mut capture: Option<Capture> = None;
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let open_depth = open.as_ref().map(|p| p.depth);
                match (e.local_name().as_ref(), open_depth) {
                    (b"Placemark", None) => {
                        open = Some(OpenPlacemark {
                            depth,
                            ..OpenPlacemark::default()
                        });
                    }
                    // Only the placemark's own <name>, not names of nested elements
                    (b"name", Some(d)) if depth == d + 1 => {
                        capture = Some(Capture::Name);
                        text.clear();
                    }
                    (b"coordinates", Some(_)) => {
                        capture = Some(Capture::Coordinates);
                        text.clear();
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let open_depth = open.as_ref().map(|p| p.depth);
                match (e.local_name().as_ref(), open.as_mut()) {
                    (b"Placemark", None) => {
                        return Err(KmlError::MissingName(placemarks.len() + 1));
                    }
                    (b"name", Some(p)) if open_depth == Some(depth) => p.name = Some(String::new()),
                    (b"coordinates", Some(p)) => p.coordinates.push(String::new()),
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) if capture.is_some() => {
                let decoded = e
                    .xml_content()
                    .map_err(|err| KmlError::Malformed(err.to_string()))?;
                text.push_str(&decoded);
            }
            Ok(Event::CData(ref e)) if capture.is_some() => {
                let decoded = e
                    .xml_content()
                    .map_err(|err| KmlError::Malformed(err.to_string()))?;
                text.push_str(&decoded);
            }
            Ok(Event::GeneralRef(ref e)) if capture.is_some() => {
                push_reference(&mut text, e)?;
            }
            Ok(Event::End(ref e)) => {
                match (e.local_name().as_ref(), capture) {
                    (b"name", Some(Capture::Name)) => {
                        if let Some(p) = open.as_mut() {
                            p.name = Some(text.trim().to_string());
                        }
                        capture = None;
                    }
                    (b"coordinates", Some(Capture::Coordinates)) => {
                        if let Some(p) = open.as_mut() {
                            p.coordinates.push(text.trim().to_string());
                        }
                        capture = None;
                    }
                    (b"Placemark", _) if open.as_ref().is_some_and(|p| p.depth == depth) => {
                        if let Some(p) = open.take() {
                            placemarks.push(p.close(placemarks.len() + 1)?);
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(KmlError::Malformed(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    if open.is_some() {
        return Err(KmlError::Malformed("document ends inside a Placemark".to_string()));
    }

    Ok(ReferenceDocument { placemarks })
}

/// Appends the text a `&...;` reference stands for
fn push_reference(text: &mut String, reference: &BytesRef<'_>) -> Result<(), KmlError> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|err| KmlError::Malformed(err.to_string()))?
    {
        text.push(ch);
        return Ok(());
    }

    let name = reference
        .decode()
        .map_err(|err| KmlError::Malformed(err.to_string()))?;
    let resolved =
        resolve_xml_entity(&name).ok_or_else(|| KmlError::UnknownEntity(name.to_string()))?;
    text.push_str(resolved);
    Ok(())
}
