//! XML storage of diagrams.
//!
//! A diagram is an `<svg>` root carrying the page attributes, with one empty
//! `<shape>` element per shape inside `<shapes>`. Loading is all-or-nothing:
//! the first malformed shape rejects the whole file.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::document::Document;
use crate::id_generator::ShapeId;

mod record;
mod xml;

pub use record::{format_color, parse_color, RecordGeometry, ShapeRecord};
pub use xml::{from_xml_str, to_xml_string};

/// Errors that can occur while saving or loading a diagram
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to access diagram file: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed diagram: {0}")]
    Malformed(String),

    #[error("Document root must be <svg>, found <{0}>")]
    InvalidRoot(String),

    #[error("Unknown shape type: {0}")]
    UnknownShapeType(String),

    #[error("Shape is missing the `{0}` attribute")]
    MissingAttribute(&'static str),

    #[error("Invalid value {value:?} for `{attribute}`")]
    InvalidValue { attribute: &'static str, value: String },

    #[error("Duplicate shape id {0}")]
    DuplicateId(ShapeId),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub fn save_to_file(document: &Document, path: &Path) -> PersistenceResult<()> {
    let xml = to_xml_string(document)?;
    fs::write(path, xml)?;
    Ok(())
}

pub fn load_from_file(path: &Path) -> PersistenceResult<Document> {
    let xml = fs::read_to_string(path)?;
    from_xml_str(&xml)
}
