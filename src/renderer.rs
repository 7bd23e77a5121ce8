use egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::canvas::CanvasController;
use crate::shape::{Shape, ShapeType, HANDLE_SIZE, ROTATION_BUTTON_SIZE};

const GRID_SPACING: f32 = 20.0;
const SELECTION_COLOR: Color32 = Color32::from_rgb(0, 120, 215);
const SNAP_COLOR: Color32 = Color32::RED;
const SNAP_RADIUS: f32 = 6.0;
const CROSS_SIZE: f32 = 4.0;

/// Paints the page, the shapes and the interaction overlays.
#[derive(Debug, Clone)]
pub struct Renderer {
    grid_color: Color32,
    page_border: Stroke,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            grid_color: Color32::from_gray(225),
            page_border: Stroke::new(1.0, Color32::from_gray(160)),
        }
    }

    /// Render the whole canvas. The painter works in page coordinates.
    pub fn render(&self, painter: &Painter, canvas: &CanvasController) {
        let document = canvas.document();
        let page_rect = Rect::from_min_size(Pos2::ZERO, document.page.effective_size());

        painter.rect_filled(page_rect, 0.0, document.page.background);
        if document.page.grid_visible {
            self.draw_grid(painter, page_rect);
        }
        painter.rect_stroke(page_rect, 0.0, self.page_border);

        for shape in document.shapes() {
            shape.draw(painter);
        }

        for shape in document.shapes().iter().filter(|s| s.is_selected()) {
            let is_primary = canvas.primary_id() == Some(shape.id());
            self.draw_selection(painter, shape, is_primary);
        }

        if let Some(hovered) = canvas.tool().hovered().and_then(|id| document.get(id)) {
            if hovered.can_rotate() {
                self.draw_magnetic_points(painter, hovered);
            }
        }

        if let Some(point) = canvas.tool().snap_indicator() {
            painter.circle_stroke(point, SNAP_RADIUS, Stroke::new(2.0, SNAP_COLOR));
        }
    }

    fn draw_grid(&self, painter: &Painter, page: Rect) {
        let stroke = Stroke::new(1.0, self.grid_color);
        let mut x = page.min.x + GRID_SPACING;
        while x < page.max.x {
            painter.vline(x, page.y_range(), stroke);
            x += GRID_SPACING;
        }
        let mut y = page.min.y + GRID_SPACING;
        while y < page.max.y {
            painter.hline(page.x_range(), y, stroke);
            y += GRID_SPACING;
        }
    }

    fn draw_selection(&self, painter: &Painter, shape: &ShapeType, is_primary: bool) {
        let stroke = Stroke::new(1.0, SELECTION_COLOR);

        if shape.can_rotate() {
            let bounds = shape.bounding_rect();
            let outline = [
                bounds.left_top(),
                bounds.right_top(),
                bounds.right_bottom(),
                bounds.left_bottom(),
                bounds.left_top(),
            ];
            painter.extend(egui::Shape::dashed_line(&outline, stroke, 4.0, 3.0));

            if is_primary {
                let button = shape.rotation_button_rect();
                painter.circle(
                    button.center(),
                    ROTATION_BUTTON_SIZE / 2.0,
                    Color32::WHITE,
                    stroke,
                );
                self.draw_rotation_glyph(painter, button.center(), stroke);
            }
        }

        for handle in shape.calculate_handles() {
            let rect = Rect::from_center_size(handle, Vec2::splat(HANDLE_SIZE));
            painter.rect_filled(rect, 0.0, Color32::WHITE);
            painter.rect_stroke(rect, 0.0, stroke);
        }
    }

    /// Three quarter circular arrow inside the rotation button.
    fn draw_rotation_glyph(&self, painter: &Painter, center: Pos2, stroke: Stroke) {
        let radius = ROTATION_BUTTON_SIZE / 2.0 - 5.0;
        let arc: Vec<Pos2> = (0..=12)
            .map(|i| {
                let angle = (-90.0 + i as f32 * 22.5_f32).to_radians();
                center + radius * Vec2::new(angle.cos(), angle.sin())
            })
            .collect();
        let tip = arc[arc.len() - 1];
        painter.add(egui::Shape::line(arc, stroke));
        painter.line_segment([tip, tip + Vec2::new(3.0, -2.0)], stroke);
        painter.line_segment([tip, tip + Vec2::new(3.0, 2.0)], stroke);
    }

    fn draw_magnetic_points(&self, painter: &Painter, shape: &ShapeType) {
        let stroke = Stroke::new(1.5, SELECTION_COLOR);
        for point in shape.magnetic_points() {
            painter.line_segment(
                [point - Vec2::splat(CROSS_SIZE), point + Vec2::splat(CROSS_SIZE)],
                stroke,
            );
            painter.line_segment(
                [
                    point + Vec2::new(-CROSS_SIZE, CROSS_SIZE),
                    point + Vec2::new(CROSS_SIZE, -CROSS_SIZE),
                ],
                stroke,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;
    use egui::{PointerButton, Modifiers};

    fn test_painter() -> Painter {
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(1200.0, 1600.0));
        Painter::new(ctx, egui::LayerId::background(), rect)
    }

    #[test]
    fn render_empty_canvas() {
        let canvas = CanvasController::default();
        Renderer::new().render(&test_painter(), &canvas);
    }

    #[test]
    fn render_every_shape_kind_selected() {
        let mut canvas = CanvasController::default();
        for (i, kind) in ShapeKind::ALL.into_iter().enumerate() {
            canvas.create_shape(kind, Pos2::new(20.0 + i as f32 * 100.0, 50.0));
        }
        canvas.select_all();
        Renderer::new().render(&test_painter(), &canvas);
    }

    #[test]
    fn render_endpoint_drag_overlays() {
        let mut canvas = CanvasController::default();
        canvas.create_shape(ShapeKind::Rectangle, Pos2::new(0.0, 0.0));
        canvas.create_shape(ShapeKind::Arrow, Pos2::new(200.0, 40.0));
        canvas.pointer_down(Pos2::new(280.0, 40.0), PointerButton::Primary, Modifiers::NONE);
        canvas.pointer_move(Pos2::new(79.0, 41.0));
        assert!(canvas.tool().snap_indicator().is_some());
        assert!(canvas.tool().hovered().is_some());
        Renderer::new().render(&test_painter(), &canvas);
    }
}
