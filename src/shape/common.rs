use egui::{Pos2, Rect, Vec2};

// Common constants for all shape types
pub const HANDLE_SIZE: f32 = 10.0;
pub const MAGNETIC_RANGE: f32 = 8.0;
pub const ARROW_HEAD_SIZE: f32 = 20.0;
pub const LINE_HIT_WIDTH: f32 = HANDLE_SIZE;
pub const ELLIPSE_SEGMENTS: usize = 60;
pub const DEFAULT_SHAPE_SIZE: f32 = 80.0;
pub const ROTATION_BUTTON_OFFSET: Vec2 = Vec2::new(10.0, -10.0);
pub const ROTATION_BUTTON_SIZE: f32 = 20.0;
pub const LINE_TEXT_SIZE: Vec2 = Vec2::new(80.0, 30.0);

/// Normalize an angle in degrees into (-180, 180].
pub fn normalize_angle(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let a = degrees.rem_euclid(360.0);
    if a > 180.0 { a - 360.0 } else { a }
}

/// Rotate a vector by `degrees` (screen coordinates, y down).
pub fn rotate_vec(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Rotate `point` about `center` by `degrees`.
pub fn rotate_point(point: Pos2, center: Pos2, degrees: f32) -> Pos2 {
    center + rotate_vec(point - center, degrees)
}

pub(crate) fn rotate_points(points: &mut [Pos2], center: Pos2, degrees: f32) {
    if degrees == 0.0 {
        return;
    }
    for p in points.iter_mut() {
        *p = rotate_point(*p, center, degrees);
    }
}

/// Calculate distance from a point to a line segment
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Even-odd containment test against a closed polygon.
pub(crate) fn point_in_polygon(point: Pos2, polygon: &[Pos2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pi.x + (point.y - pi.y) * (pj.x - pi.x) / (pj.y - pi.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Square hit area of side `HANDLE_SIZE` centered on a handle.
pub(crate) fn handle_rect(handle: Pos2) -> Rect {
    Rect::from_center_size(handle, Vec2::splat(HANDLE_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_half_open_range() {
        assert_eq!(normalize_angle(180.0), 180.0);
        assert_eq!(normalize_angle(-180.0), 180.0);
        assert_eq!(normalize_angle(190.0), -170.0);
        assert_eq!(normalize_angle(-190.0), 170.0);
        assert_eq!(normalize_angle(720.0), 0.0);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn rotate_quarter_turn() {
        let p = rotate_point(Pos2::new(10.0, 0.0), Pos2::ZERO, 90.0);
        assert!((p.x - 0.0).abs() < 0.001);
        assert!((p.y - 10.0).abs() < 0.001);
    }

    #[test]
    fn polygon_containment_even_odd() {
        let square = [
            Pos2::new(0.0, 0.0),
            Pos2::new(10.0, 0.0),
            Pos2::new(10.0, 10.0),
            Pos2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Pos2::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Pos2::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Pos2::new(5.0, 5.0), &square[..2]));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let d = distance_to_line_segment(Pos2::new(-3.0, 4.0), Pos2::ZERO, Pos2::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 0.001);
        let d = distance_to_line_segment(Pos2::new(5.0, 2.0), Pos2::ZERO, Pos2::new(10.0, 0.0));
        assert!((d - 2.0).abs() < 0.001);
    }
}
