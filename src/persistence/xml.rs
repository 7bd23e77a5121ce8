use std::collections::{HashMap, HashSet};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use super::record::{format_color, parse_color, ShapeRecord};
use super::{PersistenceError, PersistenceResult};
use crate::binding;
use crate::document::{Document, PageSettings};
use crate::shape::Shape;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

fn write_err(e: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Malformed(format!("write failed: {e}"))
}

/// Serialize the page and every shape.
pub fn to_xml_string(document: &Document) -> PersistenceResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_err)?;

    let page = &document.page;
    let size = page.effective_size();
    let width = size.x.to_string();
    let height = size.y.to_string();
    let background = format_color(page.background);
    let landscape = page.landscape.to_string();

    let mut root = BytesStart::new("svg");
    root.push_attribute(("xmlns", SVG_NS));
    root.push_attribute(("width", width.as_str()));
    root.push_attribute(("height", height.as_str()));
    root.push_attribute(("landscape", landscape.as_str()));
    root.push_attribute(("backgroundColor", background.as_str()));
    writer.write_event(Event::Start(root)).map_err(write_err)?;

    writer
        .write_event(Event::Start(BytesStart::new("shapes")))
        .map_err(write_err)?;
    for shape in document.shapes() {
        let record = ShapeRecord::from_shape(shape);
        let mut elem = BytesStart::new("shape");
        for (key, value) in record.to_attributes() {
            elem.push_attribute((key, value.as_str()));
        }
        writer.write_event(Event::Empty(elem)).map_err(write_err)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("shapes")))
        .map_err(write_err)?;

    writer
        .write_event(Event::End(BytesEnd::new("svg")))
        .map_err(write_err)?;

    String::from_utf8(writer.into_inner()).map_err(write_err)
}

fn collect_attributes(e: &BytesStart<'_>) -> PersistenceResult<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| PersistenceError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| PersistenceError::Malformed(e.to_string()))?
            .to_string();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn read_page(attrs: &HashMap<String, String>) -> PersistenceResult<PageSettings> {
    let mut page = PageSettings::default();
    if let Some(raw) = attrs.get("backgroundColor") {
        page.background = parse_color(raw).ok_or_else(|| PersistenceError::InvalidValue {
            attribute: "backgroundColor",
            value: raw.clone(),
        })?;
    }
    if let Some(raw) = attrs.get("landscape") {
        page.landscape = raw == "true";
    }

    let dimension = |key: &'static str| -> PersistenceResult<Option<f32>> {
        attrs
            .get(key)
            .map(|raw| {
                raw.parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .ok_or_else(|| PersistenceError::InvalidValue {
                        attribute: key,
                        value: raw.clone(),
                    })
            })
            .transpose()
    };
    if let (Some(w), Some(h)) = (dimension("width")?, dimension("height")?) {
        // Stored with the orientation applied
        page.size = if page.landscape {
            egui::vec2(h, w)
        } else {
            egui::vec2(w, h)
        };
    }
    Ok(page)
}

/// Parse a whole document. Any malformed shape rejects the document.
pub fn from_xml_str(xml: &str) -> PersistenceResult<Document> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut page = None;
    let mut records = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if page.is_none() {
                    if name != "svg" {
                        return Err(PersistenceError::InvalidRoot(name));
                    }
                    page = Some(read_page(&collect_attributes(e)?)?);
                } else if name == "shape" {
                    records.push(ShapeRecord::from_attributes(&collect_attributes(e)?)?);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(PersistenceError::Xml(e)),
            _ => {}
        }
    }

    let Some(page) = page else {
        return Err(PersistenceError::Malformed("document has no root element".to_owned()));
    };

    let mut seen = HashSet::new();
    let mut shapes = Vec::with_capacity(records.len());
    for record in records {
        let shape = record.into_shape()?;
        if !seen.insert(shape.id()) {
            return Err(PersistenceError::DuplicateId(shape.id()));
        }
        shapes.push(shape);
    }

    let mut document = Document::new();
    document.page = page;
    document.replace_shapes(shapes);
    binding::update_all_line_bindings(document.shapes_mut());
    Ok(document)
}
