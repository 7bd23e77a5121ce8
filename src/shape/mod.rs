use egui::{Painter, Pos2, Rect, Vec2};

mod attributes;
pub(crate) mod common;
pub(crate) mod line;
mod paint;
pub(crate) mod polygon;

pub use attributes::{
    BorderStyle, HorizontalAlign, ShapeStyle, TextAlignment, TextStyle, VerticalAlign,
};
pub use common::{
    normalize_angle, rotate_point, rotate_vec, ARROW_HEAD_SIZE, DEFAULT_SHAPE_SIZE, HANDLE_SIZE,
    MAGNETIC_RANGE, ROTATION_BUTTON_SIZE,
};
pub use line::{LineHead, LineShape};
pub use polygon::{Outline, PolygonShape};

use crate::binding::{Endpoint, EndpointBinding};
use crate::id_generator::{generate_id, ShapeId};

/// State every shape carries regardless of its geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCommon {
    pub(crate) id: ShapeId,
    pub style: ShapeStyle,
    pub text: TextStyle,
    pub(crate) selected: bool,
    pub(crate) rotation: f32,
}

impl ShapeCommon {
    pub fn new() -> Self {
        Self {
            id: generate_id(),
            style: ShapeStyle::default(),
            text: TextStyle::default(),
            selected: false,
            rotation: 0.0,
        }
    }
}

impl Default for ShapeCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// Type tag of a shape, also used as the persisted `type` attribute and as
/// the factory key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Diamond,
    Pentagon,
    Hexagon,
    Line,
    Arrow,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Rectangle,
        ShapeKind::Ellipse,
        ShapeKind::Diamond,
        ShapeKind::Pentagon,
        ShapeKind::Hexagon,
        ShapeKind::Line,
        ShapeKind::Arrow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rect",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Pentagon => "Pentagon",
            ShapeKind::Hexagon => "Hexagon",
            ShapeKind::Line => "Line",
            ShapeKind::Arrow => "Arrow",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    pub fn is_line(&self) -> bool {
        matches!(self, ShapeKind::Line | ShapeKind::Arrow)
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common trait that all diagram shapes implement
pub trait Shape {
    fn common(&self) -> &ShapeCommon;

    fn common_mut(&mut self) -> &mut ShapeCommon;

    fn kind(&self) -> ShapeKind;

    /// Paint the shape (not its selection decorations).
    fn draw(&self, painter: &Painter);

    fn contains_point(&self, pos: Pos2) -> bool;

    fn move_by(&mut self, delta: Vec2);

    /// World-space axis aligned bounds.
    fn bounding_rect(&self) -> Rect;

    /// Handle positions in world space, in handle-index order.
    fn calculate_handles(&self) -> Vec<Pos2>;

    /// Move edges or endpoints according to `handle`. Unknown handles are ignored.
    fn resize_by(&mut self, delta: Vec2, handle: usize);

    /// Anchor points connector endpoints can snap to, in a fixed order.
    fn magnetic_points(&self) -> Vec<Pos2>;

    /// Set the absolute rotation in degrees.
    fn rotate(&mut self, angle: f32);

    fn can_rotate(&self) -> bool;

    fn id(&self) -> ShapeId {
        self.common().id
    }

    fn style(&self) -> &ShapeStyle {
        &self.common().style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.common_mut().style
    }

    fn text_style(&self) -> &TextStyle {
        &self.common().text
    }

    fn text_style_mut(&mut self) -> &mut TextStyle {
        &mut self.common_mut().text
    }

    fn is_selected(&self) -> bool {
        self.common().selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.common_mut().selected = selected;
    }

    fn rotation(&self) -> f32 {
        self.common().rotation
    }

    /// Index of the first handle whose square contains `pos`.
    fn hit_handle(&self, pos: Pos2) -> Option<usize> {
        self.calculate_handles()
            .into_iter()
            .position(|handle| common::handle_rect(handle).contains(pos))
    }

    fn rotation_button_position(&self) -> Pos2 {
        self.bounding_rect().right_top() + common::ROTATION_BUTTON_OFFSET
    }

    fn rotation_button_rect(&self) -> Rect {
        Rect::from_min_size(
            self.rotation_button_position(),
            Vec2::splat(ROTATION_BUTTON_SIZE),
        )
    }
}

/// Enumeration of all shape families in a diagram
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeType {
    Polygon(PolygonShape),
    Line(LineShape),
}

impl ShapeType {
    pub fn as_line(&self) -> Option<&LineShape> {
        match self {
            ShapeType::Line(line) => Some(line),
            ShapeType::Polygon(_) => None,
        }
    }

    pub fn as_line_mut(&mut self) -> Option<&mut LineShape> {
        match self {
            ShapeType::Line(line) => Some(line),
            ShapeType::Polygon(_) => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&PolygonShape> {
        match self {
            ShapeType::Polygon(polygon) => Some(polygon),
            ShapeType::Line(_) => None,
        }
    }

    /// Copy with a fresh identity and without endpoint bindings, used when a
    /// shape is pasted or duplicated next to its original.
    pub fn clone_detached(&self) -> ShapeType {
        let mut copy = self.clone();
        copy.common_mut().id = generate_id();
        copy.set_selected(false);
        if let ShapeType::Line(line) = &mut copy {
            line.set_binding(Endpoint::Start, None);
            line.set_binding(Endpoint::End, None);
        }
        copy
    }

    /// Bindings held by this shape, if it is a connector.
    pub fn bindings(&self) -> impl Iterator<Item = (Endpoint, EndpointBinding)> + '_ {
        self.as_line().into_iter().flat_map(|line| {
            Endpoint::BOTH
                .into_iter()
                .filter_map(move |endpoint| line.binding(endpoint).map(|b| (endpoint, b)))
        })
    }
}

impl Shape for ShapeType {
    fn common(&self) -> &ShapeCommon {
        match self {
            ShapeType::Polygon(p) => p.common(),
            ShapeType::Line(l) => l.common(),
        }
    }

    fn common_mut(&mut self) -> &mut ShapeCommon {
        match self {
            ShapeType::Polygon(p) => p.common_mut(),
            ShapeType::Line(l) => l.common_mut(),
        }
    }

    fn kind(&self) -> ShapeKind {
        match self {
            ShapeType::Polygon(p) => p.kind(),
            ShapeType::Line(l) => l.kind(),
        }
    }

    fn draw(&self, painter: &Painter) {
        match self {
            ShapeType::Polygon(p) => p.draw(painter),
            ShapeType::Line(l) => l.draw(painter),
        }
    }

    fn contains_point(&self, pos: Pos2) -> bool {
        match self {
            ShapeType::Polygon(p) => p.contains_point(pos),
            ShapeType::Line(l) => l.contains_point(pos),
        }
    }

    fn move_by(&mut self, delta: Vec2) {
        match self {
            ShapeType::Polygon(p) => p.move_by(delta),
            ShapeType::Line(l) => l.move_by(delta),
        }
    }

    fn bounding_rect(&self) -> Rect {
        match self {
            ShapeType::Polygon(p) => p.bounding_rect(),
            ShapeType::Line(l) => l.bounding_rect(),
        }
    }

    fn calculate_handles(&self) -> Vec<Pos2> {
        match self {
            ShapeType::Polygon(p) => p.calculate_handles(),
            ShapeType::Line(l) => l.calculate_handles(),
        }
    }

    fn resize_by(&mut self, delta: Vec2, handle: usize) {
        match self {
            ShapeType::Polygon(p) => p.resize_by(delta, handle),
            ShapeType::Line(l) => l.resize_by(delta, handle),
        }
    }

    fn magnetic_points(&self) -> Vec<Pos2> {
        match self {
            ShapeType::Polygon(p) => p.magnetic_points(),
            ShapeType::Line(l) => l.magnetic_points(),
        }
    }

    fn rotate(&mut self, angle: f32) {
        match self {
            ShapeType::Polygon(p) => p.rotate(angle),
            ShapeType::Line(l) => l.rotate(angle),
        }
    }

    fn can_rotate(&self) -> bool {
        match self {
            ShapeType::Polygon(p) => p.can_rotate(),
            ShapeType::Line(l) => l.can_rotate(),
        }
    }
}

/// Factory functions for creating shapes
pub mod factory {
    use super::*;

    /// Create a default-styled shape of `kind` placed at `pos`.
    pub fn create_shape(kind: ShapeKind, pos: Pos2) -> ShapeType {
        create_shape_sized(kind, pos, DEFAULT_SHAPE_SIZE)
    }

    /// Polygon shapes get an `extent` square with `pos` as its top-left
    /// corner, connectors run horizontally from `pos` for `extent`.
    pub fn create_shape_sized(kind: ShapeKind, pos: Pos2, extent: f32) -> ShapeType {
        let size = Vec2::splat(extent);
        match kind {
            ShapeKind::Rectangle => create_polygon(Outline::Rectangle, Rect::from_min_size(pos, size)),
            ShapeKind::Ellipse => create_polygon(Outline::Ellipse, Rect::from_min_size(pos, size)),
            ShapeKind::Diamond => create_polygon(Outline::Diamond, Rect::from_min_size(pos, size)),
            ShapeKind::Pentagon => create_polygon(Outline::Pentagon, Rect::from_min_size(pos, size)),
            ShapeKind::Hexagon => create_polygon(Outline::Hexagon, Rect::from_min_size(pos, size)),
            ShapeKind::Line => create_line(LineHead::Plain, pos, pos + Vec2::new(extent, 0.0)),
            ShapeKind::Arrow => create_line(LineHead::Arrow, pos, pos + Vec2::new(extent, 0.0)),
        }
    }

    /// Look up the factory entry point by its type tag.
    pub fn create_by_tag(tag: &str, pos: Pos2) -> Option<ShapeType> {
        ShapeKind::parse(tag).map(|kind| create_shape(kind, pos))
    }

    pub fn create_polygon(outline: Outline, rect: Rect) -> ShapeType {
        ShapeType::Polygon(PolygonShape::new(outline, rect))
    }

    pub fn create_line(head: LineHead, start: Pos2, end: Pos2) -> ShapeType {
        ShapeType::Line(LineShape::new(head, start, end))
    }
}
