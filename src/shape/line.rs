use egui::{Painter, Pos2, Rect, Vec2};

use super::common::{
    distance_to_line_segment, normalize_angle, ARROW_HEAD_SIZE, LINE_HIT_WIDTH, LINE_TEXT_SIZE,
};
use super::paint::{paint_outline, paint_text};
use super::{Shape, ShapeCommon, ShapeKind};
use crate::binding::{Endpoint, EndpointBinding};

/// Decoration drawn at the end point of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineHead {
    Plain,
    Arrow,
}

/// Two-endpoint connector whose ends can be bound to other shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    common: ShapeCommon,
    head: LineHead,
    start: Pos2,
    end: Pos2,
    start_binding: Option<EndpointBinding>,
    end_binding: Option<EndpointBinding>,
}

impl LineShape {
    pub fn new(head: LineHead, start: Pos2, end: Pos2) -> Self {
        Self::with_common(ShapeCommon::new(), head, start, end)
    }

    pub(crate) fn with_common(common: ShapeCommon, head: LineHead, start: Pos2, end: Pos2) -> Self {
        Self {
            common,
            head,
            start,
            end,
            start_binding: None,
            end_binding: None,
        }
    }

    pub fn head(&self) -> LineHead {
        self.head
    }

    pub fn start(&self) -> Pos2 {
        self.start
    }

    pub fn end(&self) -> Pos2 {
        self.end
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> Pos2 {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    pub fn set_endpoint(&mut self, endpoint: Endpoint, pos: Pos2) {
        match endpoint {
            Endpoint::Start => self.start = pos,
            Endpoint::End => self.end = pos,
        }
    }

    pub fn binding(&self, endpoint: Endpoint) -> Option<EndpointBinding> {
        match endpoint {
            Endpoint::Start => self.start_binding,
            Endpoint::End => self.end_binding,
        }
    }

    pub fn set_binding(&mut self, endpoint: Endpoint, binding: Option<EndpointBinding>) {
        match endpoint {
            Endpoint::Start => self.start_binding = binding,
            Endpoint::End => self.end_binding = binding,
        }
    }

    pub fn midpoint(&self) -> Pos2 {
        self.start.lerp(self.end, 0.5)
    }

    /// Triangle with the apex on the end point, `None` for plain lines.
    pub fn arrow_head(&self) -> Option<[Pos2; 3]> {
        if self.head != LineHead::Arrow {
            return None;
        }
        let direction = self.end - self.start;
        let theta = direction.y.atan2(direction.x);
        let wing = |offset: f32| {
            let a = theta + offset.to_radians();
            self.end - ARROW_HEAD_SIZE * Vec2::new(a.cos(), a.sin())
        };
        Some([self.end, wing(-30.0), wing(30.0)])
    }
}

impl Shape for LineShape {
    fn common(&self) -> &ShapeCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ShapeCommon {
        &mut self.common
    }

    fn kind(&self) -> ShapeKind {
        match self.head {
            LineHead::Plain => ShapeKind::Line,
            LineHead::Arrow => ShapeKind::Arrow,
        }
    }

    fn draw(&self, painter: &Painter) {
        paint_outline(painter, &[self.start, self.end], false, &self.common.style);

        if let Some(head) = self.arrow_head() {
            painter.add(egui::Shape::convex_polygon(
                head.to_vec(),
                self.common.style.border_color,
                egui::Stroke::NONE,
            ));
        }

        let text_rect = Rect::from_center_size(self.midpoint(), LINE_TEXT_SIZE);
        paint_text(painter, text_rect, 0.0, &self.common.text);
    }

    fn contains_point(&self, pos: Pos2) -> bool {
        distance_to_line_segment(pos, self.start, self.end) <= LINE_HIT_WIDTH / 2.0
    }

    fn move_by(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    fn bounding_rect(&self) -> Rect {
        Rect::from_two_pos(self.start, self.end)
    }

    fn calculate_handles(&self) -> Vec<Pos2> {
        vec![self.start, self.midpoint(), self.end]
    }

    fn resize_by(&mut self, delta: Vec2, handle: usize) {
        match handle {
            0 => self.start += delta,
            1 => self.move_by(delta),
            2 => self.end += delta,
            _ => {}
        }
    }

    fn magnetic_points(&self) -> Vec<Pos2> {
        vec![self.start, self.end]
    }

    /// Stored for persistence only; connectors are never drawn rotated.
    fn rotate(&mut self, angle: f32) {
        self.common.rotation = normalize_angle(angle);
    }

    fn can_rotate(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrow() -> LineShape {
        LineShape::new(LineHead::Arrow, Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0))
    }

    #[test]
    fn arrow_head_wings_trail_the_end() {
        let head = arrow().arrow_head().unwrap();
        assert_eq!(head[0], Pos2::new(100.0, 0.0));
        let back = 100.0 - ARROW_HEAD_SIZE * 30f32.to_radians().cos();
        let side = ARROW_HEAD_SIZE * 30f32.to_radians().sin();
        assert!((head[1].x - back).abs() < 0.001);
        assert!((head[1].y - side).abs() < 0.001);
        assert!((head[2].x - back).abs() < 0.001);
        assert!((head[2].y + side).abs() < 0.001);
    }

    #[test]
    fn plain_line_has_no_head() {
        let line = LineShape::new(LineHead::Plain, Pos2::ZERO, Pos2::new(10.0, 0.0));
        assert!(line.arrow_head().is_none());
    }

    #[test]
    fn hit_corridor_is_half_handle_wide() {
        let line = arrow();
        assert!(line.contains_point(Pos2::new(50.0, 4.9)));
        assert!(!line.contains_point(Pos2::new(50.0, 5.5)));
    }

    #[test]
    fn midpoint_handle_translates() {
        let mut line = arrow();
        line.resize_by(Vec2::new(3.0, 4.0), 1);
        assert_eq!(line.start(), Pos2::new(3.0, 4.0));
        assert_eq!(line.end(), Pos2::new(103.0, 4.0));
        line.resize_by(Vec2::new(1.0, 1.0), 3);
        assert_eq!(line.start(), Pos2::new(3.0, 4.0));
    }

    #[test]
    fn lines_do_not_rotate() {
        let mut line = arrow();
        assert!(!line.can_rotate());
        line.rotate(370.0);
        assert_eq!(line.rotation(), 10.0);
        assert_eq!(line.end(), Pos2::new(100.0, 0.0));
    }
}
