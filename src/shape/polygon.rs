use egui::{Painter, Pos2, Rect, Vec2};

use super::common::{
    calculate_bounds, normalize_angle, point_in_polygon, rotate_points, rotate_vec,
    ELLIPSE_SEGMENTS,
};
use super::paint::{paint_outline, paint_text};
use super::{Shape, ShapeCommon, ShapeKind};

/// Outline family of a rect-bounded shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outline {
    Rectangle,
    Ellipse,
    Diamond,
    Pentagon,
    Hexagon,
}

impl Outline {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Outline::Rectangle => ShapeKind::Rectangle,
            Outline::Ellipse => ShapeKind::Ellipse,
            Outline::Diamond => ShapeKind::Diamond,
            Outline::Pentagon => ShapeKind::Pentagon,
            Outline::Hexagon => ShapeKind::Hexagon,
        }
    }

    pub fn from_kind(kind: ShapeKind) -> Option<Self> {
        match kind {
            ShapeKind::Rectangle => Some(Outline::Rectangle),
            ShapeKind::Ellipse => Some(Outline::Ellipse),
            ShapeKind::Diamond => Some(Outline::Diamond),
            ShapeKind::Pentagon => Some(Outline::Pentagon),
            ShapeKind::Hexagon => Some(Outline::Hexagon),
            ShapeKind::Line | ShapeKind::Arrow => None,
        }
    }

    /// Vertices of the outline inscribed in `rect`, before rotation.
    fn local_points(&self, rect: Rect) -> Vec<Pos2> {
        match self {
            Outline::Rectangle => vec![
                rect.left_top(),
                rect.right_top(),
                rect.right_bottom(),
                rect.left_bottom(),
            ],
            Outline::Ellipse => {
                let center = rect.center();
                let (rx, ry) = (rect.width() / 2.0, rect.height() / 2.0);
                (0..ELLIPSE_SEGMENTS)
                    .map(|i| {
                        let angle = (i as f32 * 360.0 / ELLIPSE_SEGMENTS as f32).to_radians();
                        center + Vec2::new(rx * angle.cos(), ry * angle.sin())
                    })
                    .collect()
            }
            Outline::Diamond => vec![
                rect.center_top(),
                rect.right_center(),
                rect.center_bottom(),
                rect.left_center(),
            ],
            Outline::Pentagon => regular_polygon(5, rect),
            Outline::Hexagon => regular_polygon(6, rect),
        }
    }
}

/// Regular `sides`-gon starting at -90 degrees, stretched from its own
/// bounding box onto `rect`.
fn regular_polygon(sides: usize, rect: Rect) -> Vec<Pos2> {
    let step = 360.0 / sides as f32;
    let unit: Vec<Pos2> = (0..sides)
        .map(|i| {
            let angle = (-90.0 + step * i as f32).to_radians();
            Pos2::new(angle.cos(), angle.sin())
        })
        .collect();

    let bounds = calculate_bounds(&unit, 0.0);
    unit.into_iter()
        .map(|p| {
            Pos2::new(
                rect.min.x + (p.x - bounds.min.x) / bounds.width() * rect.width(),
                rect.min.y + (p.y - bounds.min.y) / bounds.height() * rect.height(),
            )
        })
        .collect()
}

/// A shape derived from a local bounding rectangle and a rotation angle.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    common: ShapeCommon,
    outline: Outline,
    /// Unrotated bounds, always normalized.
    rect: Rect,
    /// World-space vertices re-derived from `rect` and the rotation.
    points: Vec<Pos2>,
}

impl PolygonShape {
    pub fn new(outline: Outline, rect: Rect) -> Self {
        Self::with_common(ShapeCommon::new(), outline, rect)
    }

    pub(crate) fn with_common(common: ShapeCommon, outline: Outline, rect: Rect) -> Self {
        let mut shape = Self {
            common,
            outline,
            rect: Rect::from_two_pos(rect.min, rect.max),
            points: Vec::new(),
        };
        shape.update_points();
        shape
    }

    pub fn outline(&self) -> Outline {
        self.outline
    }

    /// The unrotated rectangle the outline is inscribed in.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = Rect::from_two_pos(rect.min, rect.max);
        self.update_points();
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    fn update_points(&mut self) {
        let mut points = self.outline.local_points(self.rect);
        rotate_points(&mut points, self.rect.center(), self.common.rotation);
        self.points = points;
    }

    fn local_magnetic_points(&self) -> Vec<Pos2> {
        let r = self.rect;
        match self.outline {
            Outline::Rectangle => vec![
                r.left_top(),
                r.right_top(),
                r.left_bottom(),
                r.right_bottom(),
                r.center_top(),
                r.center_bottom(),
                r.left_center(),
                r.right_center(),
            ],
            Outline::Ellipse => {
                let c = r.center();
                let (rx, ry) = (r.width() / 2.0, r.height() / 2.0);
                let (dx, dy) = (rx * 45f32.to_radians().cos(), ry * 45f32.to_radians().sin());
                vec![
                    c + Vec2::new(0.0, -ry),
                    c + Vec2::new(rx, 0.0),
                    c + Vec2::new(0.0, ry),
                    c + Vec2::new(-rx, 0.0),
                    c + Vec2::new(dx, -dy),
                    c + Vec2::new(dx, dy),
                    c + Vec2::new(-dx, dy),
                    c + Vec2::new(-dx, -dy),
                ]
            }
            Outline::Diamond | Outline::Pentagon | Outline::Hexagon => {
                let vertices = self.outline.local_points(r);
                let n = vertices.len();
                let midpoints: Vec<Pos2> = (0..n)
                    .map(|i| vertices[i].lerp(vertices[(i + 1) % n], 0.5))
                    .collect();
                vertices.into_iter().chain(midpoints).collect()
            }
        }
    }

    fn local_handles(&self) -> Vec<Pos2> {
        let r = self.rect;
        vec![
            r.left_top(),
            r.center_top(),
            r.right_top(),
            r.left_center(),
            r.right_center(),
            r.left_bottom(),
            r.center_bottom(),
            r.right_bottom(),
        ]
    }
}

impl Shape for PolygonShape {
    fn common(&self) -> &ShapeCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ShapeCommon {
        &mut self.common
    }

    fn kind(&self) -> ShapeKind {
        self.outline.kind()
    }

    fn draw(&self, painter: &Painter) {
        painter.add(egui::Shape::convex_polygon(
            self.points.clone(),
            self.common.style.fill_color,
            egui::Stroke::NONE,
        ));
        paint_outline(painter, &self.points, true, &self.common.style);
        paint_text(painter, self.rect, self.common.rotation, &self.common.text);
    }

    fn contains_point(&self, pos: Pos2) -> bool {
        point_in_polygon(pos, &self.points)
    }

    fn move_by(&mut self, delta: Vec2) {
        self.rect = self.rect.translate(delta);
        self.update_points();
    }

    fn bounding_rect(&self) -> Rect {
        calculate_bounds(&self.points, 0.0)
    }

    fn calculate_handles(&self) -> Vec<Pos2> {
        let mut handles = self.local_handles();
        rotate_points(&mut handles, self.rect.center(), self.common.rotation);
        handles
    }

    fn resize_by(&mut self, delta: Vec2, handle: usize) {
        let d = rotate_vec(delta, -self.common.rotation);
        let old = self.rect;
        let (mut min, mut max) = (old.min, old.max);

        match handle {
            0 => min += d,
            1 => min.y += d.y,
            2 => {
                min.y += d.y;
                max.x += d.x;
            }
            3 => min.x += d.x,
            4 => max.x += d.x,
            5 => {
                min.x += d.x;
                max.y += d.y;
            }
            6 => max.y += d.y,
            7 => max += d,
            _ => return,
        }

        // Rotation pivots on the rect center, so shift the new rect until the
        // edges opposite the handle stay where they were on screen.
        let resized = Rect::from_min_max(min, max);
        let center_shift = resized.center() - old.center();
        let anchor = rotate_vec(center_shift, self.common.rotation) - center_shift;
        let moved = resized.translate(anchor);

        self.rect = Rect::from_two_pos(moved.min, moved.max);
        self.update_points();
    }

    fn magnetic_points(&self) -> Vec<Pos2> {
        let mut points = self.local_magnetic_points();
        rotate_points(&mut points, self.rect.center(), self.common.rotation);
        points
    }

    fn rotate(&mut self, angle: f32) {
        self.common.rotation = normalize_angle(angle);
        self.update_points();
    }

    fn can_rotate(&self) -> bool {
        true
    }
}
