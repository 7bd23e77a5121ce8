use std::collections::HashMap;

use egui::{Color32, Pos2, Rect};

use super::{PersistenceError, PersistenceResult};
use crate::binding::{Endpoint, EndpointBinding};
use crate::id_generator::ShapeId;
use crate::shape::{
    BorderStyle, LineHead, LineShape, Outline, PolygonShape, Shape, ShapeCommon, ShapeKind,
    ShapeStyle, ShapeType, TextAlignment, TextStyle,
};

/// Geometry part of a persisted shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordGeometry {
    /// Unrotated bounds plus rotation in degrees.
    Rect { rect: Rect, rotation: f32 },
    Line { start: Pos2, end: Pos2, rotation: f32 },
}

/// Flat attribute record of one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    pub kind: ShapeKind,
    pub id: Option<ShapeId>,
    pub geometry: RecordGeometry,
    pub style: ShapeStyle,
    pub text: TextStyle,
    pub start_binding: Option<EndpointBinding>,
    pub end_binding: Option<EndpointBinding>,
}

impl ShapeRecord {
    pub fn from_shape(shape: &ShapeType) -> Self {
        let common = shape.common();
        let (geometry, start_binding, end_binding) = match shape {
            ShapeType::Polygon(polygon) => (
                RecordGeometry::Rect {
                    rect: polygon.rect(),
                    rotation: common.rotation,
                },
                None,
                None,
            ),
            ShapeType::Line(line) => (
                RecordGeometry::Line {
                    start: line.start(),
                    end: line.end(),
                    rotation: common.rotation,
                },
                line.binding(Endpoint::Start),
                line.binding(Endpoint::End),
            ),
        };

        Self {
            kind: shape.kind(),
            id: Some(common.id),
            geometry,
            style: common.style.clone(),
            text: common.text.clone(),
            start_binding,
            end_binding,
        }
    }

    /// Rebuild the shape. Records without an id get a fresh one.
    pub fn into_shape(self) -> PersistenceResult<ShapeType> {
        let mut common = ShapeCommon::new();
        if let Some(id) = self.id {
            common.id = id;
        }
        common.style = self.style;
        common.text = self.text;

        let shape = match (self.geometry, Outline::from_kind(self.kind)) {
            (RecordGeometry::Rect { rect, rotation }, Some(outline)) => {
                let mut polygon = PolygonShape::with_common(common, outline, rect);
                polygon.rotate(rotation);
                ShapeType::Polygon(polygon)
            }
            (RecordGeometry::Line { start, end, rotation }, None) => {
                let head = if self.kind == ShapeKind::Arrow {
                    LineHead::Arrow
                } else {
                    LineHead::Plain
                };
                let mut line = LineShape::with_common(common, head, start, end);
                line.rotate(rotation);
                line.set_binding(Endpoint::Start, self.start_binding);
                line.set_binding(Endpoint::End, self.end_binding);
                ShapeType::Line(line)
            }
            _ => {
                return Err(PersistenceError::Malformed(format!(
                    "geometry does not match shape type {}",
                    self.kind
                )));
            }
        };
        Ok(shape)
    }

    /// Attribute list in the order it is written.
    pub fn to_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![("type", self.kind.as_str().to_owned())];
        if let Some(id) = self.id {
            attrs.push(("id", id.to_string()));
        }

        match &self.geometry {
            RecordGeometry::Rect { rect, rotation } => {
                attrs.push(("x", rect.min.x.to_string()));
                attrs.push(("y", rect.min.y.to_string()));
                attrs.push(("width", rect.width().to_string()));
                attrs.push(("height", rect.height().to_string()));
                attrs.push(("rotation", rotation.to_string()));
            }
            RecordGeometry::Line { start, end, rotation } => {
                attrs.push(("startX", start.x.to_string()));
                attrs.push(("startY", start.y.to_string()));
                attrs.push(("endX", end.x.to_string()));
                attrs.push(("endY", end.y.to_string()));
                attrs.push(("rotation", rotation.to_string()));
            }
        }

        let style = &self.style;
        attrs.push(("penWidth", style.pen_width().to_string()));
        attrs.push(("borderColor", format_color(style.border_color)));
        attrs.push(("fillColor", format_color(style.fill_color)));
        attrs.push(("borderStyle", style.border_style.as_str().to_owned()));

        let text = &self.text;
        attrs.push(("text", text.text.clone()));
        attrs.push(("fontFamily", text.font_family.clone()));
        attrs.push(("fontSize", text.font_size().to_string()));
        attrs.push(("fontBold", text.bold.to_string()));
        attrs.push(("fontItalic", text.italic.to_string()));
        attrs.push(("fontUnderline", text.underline.to_string()));
        attrs.push(("fontColor", format_color(text.font_color)));
        attrs.push(("textAlignment", text.alignment.to_attribute()));

        let bindings = [
            ("startTarget", "startIndex", self.start_binding),
            ("endTarget", "endIndex", self.end_binding),
        ];
        for (target_key, index_key, binding) in bindings {
            if let Some(binding) = binding {
                attrs.push((target_key, binding.target.to_string()));
                attrs.push((index_key, binding.magnetic_index.to_string()));
            }
        }
        attrs
    }

    pub fn from_attributes(attrs: &HashMap<String, String>) -> PersistenceResult<Self> {
        let fields = Fields(attrs);

        let tag = fields.required("type")?;
        let kind = ShapeKind::parse(tag)
            .ok_or_else(|| PersistenceError::UnknownShapeType(tag.to_owned()))?;

        let id = fields
            .optional("id")
            .map(|raw| ShapeId::parse(raw).ok_or_else(|| invalid("id", raw)))
            .transpose()?;

        let rotation = fields.parse_f32("rotation")?;
        let geometry = if kind.is_line() {
            RecordGeometry::Line {
                start: Pos2::new(fields.parse_f32("startX")?, fields.parse_f32("startY")?),
                end: Pos2::new(fields.parse_f32("endX")?, fields.parse_f32("endY")?),
                rotation,
            }
        } else {
            let min = Pos2::new(fields.parse_f32("x")?, fields.parse_f32("y")?);
            let size = egui::vec2(fields.parse_f32("width")?, fields.parse_f32("height")?);
            RecordGeometry::Rect {
                rect: Rect::from_min_size(min, size),
                rotation,
            }
        };

        let mut style = ShapeStyle::default();
        style.set_pen_width(fields.parse_u32("penWidth")?);
        style.border_color = fields.parse_color("borderColor")?;
        style.fill_color = fields.parse_color("fillColor")?;
        style.border_style = fields.parse_with("borderStyle", BorderStyle::parse)?;

        let mut text = TextStyle::default();
        text.text = fields.required("text")?.to_owned();
        text.font_family = fields.required("fontFamily")?.to_owned();
        text.bold = fields.parse_bool("fontBold")?;
        text.italic = fields.parse_bool("fontItalic")?;
        text.underline = fields.parse_bool("fontUnderline")?;
        text.font_color = fields.parse_color("fontColor")?;
        text.alignment = fields.parse_with("textAlignment", TextAlignment::parse)?;
        text.set_font_size(fields.parse_u32("fontSize")?);

        Ok(Self {
            kind,
            id,
            geometry,
            style,
            text,
            start_binding: fields.binding("startTarget", "startIndex")?,
            end_binding: fields.binding("endTarget", "endIndex")?,
        })
    }
}

fn invalid(attribute: &'static str, value: &str) -> PersistenceError {
    PersistenceError::InvalidValue {
        attribute,
        value: value.to_owned(),
    }
}

/// Typed lookups over a shape element's attributes.
struct Fields<'a>(&'a HashMap<String, String>);

impl<'a> Fields<'a> {
    fn optional(&self, key: &'static str) -> Option<&'a str> {
        self.0.get(key).map(String::as_str)
    }

    fn required(&self, key: &'static str) -> PersistenceResult<&'a str> {
        self.optional(key)
            .ok_or(PersistenceError::MissingAttribute(key))
    }

    fn parse_with<T>(&self, key: &'static str, parse: impl Fn(&str) -> Option<T>) -> PersistenceResult<T> {
        let raw = self.required(key)?;
        parse(raw.trim()).ok_or_else(|| invalid(key, raw))
    }

    fn parse_f32(&self, key: &'static str) -> PersistenceResult<f32> {
        self.parse_with(key, |s| s.parse::<f32>().ok().filter(|v| v.is_finite()))
    }

    fn parse_u32(&self, key: &'static str) -> PersistenceResult<u32> {
        self.parse_with(key, |s| s.parse::<u32>().ok())
    }

    fn parse_bool(&self, key: &'static str) -> PersistenceResult<bool> {
        self.parse_with(key, |s| match s {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        })
    }

    fn parse_color(&self, key: &'static str) -> PersistenceResult<Color32> {
        self.parse_with(key, parse_color)
    }

    fn binding(
        &self,
        target_key: &'static str,
        index_key: &'static str,
    ) -> PersistenceResult<Option<EndpointBinding>> {
        let Some(raw_target) = self.optional(target_key) else {
            return Ok(None);
        };
        let target = ShapeId::parse(raw_target).ok_or_else(|| invalid(target_key, raw_target))?;
        let magnetic_index = self.parse_with(index_key, |s| s.parse::<usize>().ok())?;
        Ok(Some(EndpointBinding {
            target,
            magnetic_index,
        }))
    }
}

/// `#rrggbb`, or `#rrggbbaa` when not opaque.
pub fn format_color(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == u8::MAX {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

pub fn parse_color(s: &str) -> Option<Color32> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            channel(6)?,
        )),
        _ => None,
    }
}
