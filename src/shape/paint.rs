use egui::epaint::TextShape;
use egui::text::{LayoutJob, TextFormat};
use egui::{Painter, Pos2, Rect, Stroke, Vec2};

use super::attributes::{ShapeStyle, TextStyle};
use super::common::rotate_point;

/// Stroke a polyline with the style's pen and dash pattern.
pub(crate) fn paint_outline(painter: &Painter, points: &[Pos2], closed: bool, style: &ShapeStyle) {
    if points.len() < 2 {
        return;
    }

    let mut path = points.to_vec();
    if closed {
        path.push(points[0]);
    }

    let stroke = style.stroke();
    match style.border_style.pattern() {
        None => {
            painter.add(egui::Shape::line(path, stroke));
        }
        Some((dashes, gaps)) => {
            let unit = stroke.width.max(2.0);
            let dashes: Vec<f32> = dashes.iter().map(|d| d * unit).collect();
            let gaps: Vec<f32> = gaps.iter().map(|g| g * unit).collect();
            painter.extend(egui::Shape::dashed_line_with_offset(
                &path, stroke, &dashes, &gaps, 0.0,
            ));
        }
    }
}

/// Lay out the text inside `rect` (local frame) and rotate it about the
/// rect center.
pub(crate) fn paint_text(painter: &Painter, rect: Rect, rotation: f32, style: &TextStyle) {
    if style.text.is_empty() {
        return;
    }

    let mut job = LayoutJob::default();
    job.wrap.max_width = rect.width().max(1.0);
    job.append(
        &style.text,
        0.0,
        TextFormat {
            font_id: style.font_id(),
            color: style.font_color,
            italics: style.italic,
            underline: if style.underline {
                Stroke::new(1.0, style.font_color)
            } else {
                Stroke::NONE
            },
            ..Default::default()
        },
    );
    let galley = painter.layout_job(job);

    let placed = style.alignment.align2().align_size_within_rect(galley.size(), rect);
    let pos = rotate_point(placed.min, rect.center(), rotation);
    let angle = rotation.to_radians();

    if style.bold {
        // No bold face in the default fonts: overdraw with a small offset
        let nudge = Vec2::new(0.6, 0.0);
        painter.add(TextShape::new(pos + nudge, galley.clone(), style.font_color).with_angle(angle));
    }
    painter.add(TextShape::new(pos, galley, style.font_color).with_angle(angle));
}
