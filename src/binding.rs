//! Connector endpoint bindings.
//!
//! A bound endpoint stores the id of the target shape and the index of one of
//! its magnetic points. The reference is resolved through the shape collection
//! every time; when the target is gone or no longer has that many magnetic
//! points, the binding is dropped.

use egui::Pos2;
use log::debug;

use crate::id_generator::ShapeId;
use crate::shape::{Shape, ShapeType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    pub const BOTH: [Endpoint; 2] = [Endpoint::Start, Endpoint::End];

    /// Handle index of this endpoint on a connector.
    pub fn handle_index(&self) -> usize {
        match self {
            Endpoint::Start => 0,
            Endpoint::End => 2,
        }
    }
}

/// Weak reference from a connector endpoint to a magnetic point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointBinding {
    pub target: ShapeId,
    pub magnetic_index: usize,
}

/// Candidate magnetic point found while dragging an endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub binding: EndpointBinding,
    pub point: Pos2,
    pub distance: f32,
}

/// Nearest magnetic point of any shape other than `exclude`.
pub fn find_nearest_magnetic_point(
    shapes: &[ShapeType],
    exclude: ShapeId,
    pos: Pos2,
) -> Option<SnapTarget> {
    let mut best: Option<SnapTarget> = None;
    for shape in shapes.iter().filter(|s| s.id() != exclude) {
        for (index, point) in shape.magnetic_points().into_iter().enumerate() {
            let distance = pos.distance(point);
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(SnapTarget {
                    binding: EndpointBinding {
                        target: shape.id(),
                        magnetic_index: index,
                    },
                    point,
                    distance,
                });
            }
        }
    }
    best
}

/// Nearest magnetic point strictly closer than `range`.
pub fn snap_target(
    shapes: &[ShapeType],
    exclude: ShapeId,
    pos: Pos2,
    range: f32,
) -> Option<SnapTarget> {
    find_nearest_magnetic_point(shapes, exclude, pos).filter(|t| t.distance < range)
}

fn resolve(shapes: &[ShapeType], binding: EndpointBinding) -> Option<Pos2> {
    shapes
        .iter()
        .find(|s| s.id() == binding.target)
        .and_then(|s| s.magnetic_points().get(binding.magnetic_index).copied())
}

/// Re-derive every bound endpoint from its target, clearing bindings that no
/// longer resolve.
///
/// Connectors may be bound to other connectors, so the pass repeats until the
/// positions settle.
pub fn update_all_line_bindings(shapes: &mut [ShapeType]) {
    for _ in 0..=shapes.len() {
        let mut changed = false;
        for i in 0..shapes.len() {
            let Some(line) = shapes[i].as_line() else {
                continue;
            };
            let updates: Vec<(Endpoint, Option<Pos2>)> = Endpoint::BOTH
                .into_iter()
                .filter_map(|endpoint| {
                    line.binding(endpoint)
                        .map(|binding| (endpoint, resolve(shapes, binding)))
                })
                .collect();

            let Some(line) = shapes[i].as_line_mut() else {
                continue;
            };
            for (endpoint, resolved) in updates {
                match resolved {
                    Some(pos) => {
                        if line.endpoint(endpoint) != pos {
                            line.set_endpoint(endpoint, pos);
                            changed = true;
                        }
                    }
                    None => {
                        debug!("Dropping stale binding on {:?} of line {}", endpoint, line.id());
                        line.set_binding(endpoint, None);
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
}

/// Clear every binding that targets `target`.
pub fn clear_bindings_to(shapes: &mut [ShapeType], target: ShapeId) {
    for shape in shapes.iter_mut() {
        if let Some(line) = shape.as_line_mut() {
            for endpoint in Endpoint::BOTH {
                if line.binding(endpoint).is_some_and(|b| b.target == target) {
                    line.set_binding(endpoint, None);
                }
            }
        }
    }
}

/// A connector moved on its own keeps only the bindings whose targets moved
/// with it. `moved` lists every shape that was translated.
pub fn detach_from_unmoved(shapes: &mut [ShapeType], moved: &[ShapeId]) {
    for shape in shapes.iter_mut() {
        if !moved.contains(&shape.id()) {
            continue;
        }
        if let Some(line) = shape.as_line_mut() {
            for endpoint in Endpoint::BOTH {
                if line.binding(endpoint).is_some_and(|b| !moved.contains(&b.target)) {
                    debug!("Detached {:?} of moved line {}", endpoint, line.id());
                    line.set_binding(endpoint, None);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::factory;
    use crate::shape::{LineHead, Outline};
    use egui::{Rect, Vec2};

    fn rect_at_origin() -> ShapeType {
        factory::create_polygon(
            Outline::Rectangle,
            Rect::from_min_size(Pos2::ZERO, Vec2::splat(80.0)),
        )
    }

    #[test]
    fn nearest_point_skips_excluded_shape() {
        let rect = rect_at_origin();
        let line = factory::create_line(LineHead::Plain, Pos2::new(200.0, 0.0), Pos2::new(81.0, 41.0));
        let line_id = line.id();
        let shapes = vec![rect, line];

        let target = find_nearest_magnetic_point(&shapes, line_id, Pos2::new(81.0, 41.0)).unwrap();
        assert_eq!(target.binding.magnetic_index, 7);
        assert_eq!(target.point, Pos2::new(80.0, 40.0));
    }

    #[test]
    fn snap_range_is_exclusive() {
        let shapes = vec![rect_at_origin()];
        let exclude = crate::id_generator::generate_id();
        assert!(snap_target(&shapes, exclude, Pos2::new(88.0, 40.0), 8.0).is_none());
        assert!(snap_target(&shapes, exclude, Pos2::new(87.9, 40.0), 8.0).is_some());
    }

    #[test]
    fn out_of_range_index_is_cleared() {
        let rect = rect_at_origin();
        let mut line = factory::create_line(LineHead::Plain, Pos2::ZERO, Pos2::new(10.0, 0.0));
        if let Some(l) = line.as_line_mut() {
            l.set_binding(
                Endpoint::End,
                Some(EndpointBinding {
                    target: rect.id(),
                    magnetic_index: 42,
                }),
            );
        }
        let mut shapes = vec![rect, line];
        update_all_line_bindings(&mut shapes);
        let line = shapes[1].as_line().unwrap();
        assert!(line.binding(Endpoint::End).is_none());
        assert_eq!(line.end(), Pos2::new(10.0, 0.0));
    }

    #[test]
    fn chained_connectors_settle() {
        let rect = rect_at_origin();
        let mut first = factory::create_line(LineHead::Plain, Pos2::new(300.0, 0.0), Pos2::new(300.0, 100.0));
        let mut second = factory::create_line(LineHead::Arrow, Pos2::new(400.0, 0.0), Pos2::new(400.0, 100.0));
        let rect_id = rect.id();
        let first_id = first.id();
        // second.end -> first.end, first.end -> rect bottom-right; second listed first
        if let Some(l) = second.as_line_mut() {
            l.set_binding(Endpoint::End, Some(EndpointBinding { target: first_id, magnetic_index: 1 }));
        }
        if let Some(l) = first.as_line_mut() {
            l.set_binding(Endpoint::End, Some(EndpointBinding { target: rect_id, magnetic_index: 3 }));
        }
        let mut shapes = vec![rect, second, first];
        update_all_line_bindings(&mut shapes);
        assert_eq!(shapes[2].as_line().unwrap().end(), Pos2::new(80.0, 80.0));
        assert_eq!(shapes[1].as_line().unwrap().end(), Pos2::new(80.0, 80.0));
    }
}
