use eframe_diagram::binding::{self, Endpoint, EndpointBinding};
use eframe_diagram::shape::{factory, LineHead, Outline};
use eframe_diagram::shape::LineShape;
use eframe_diagram::{CanvasController, Shape, ShapeId, ShapeKind, ShapeType};
use egui::{Modifiers, PointerButton, Pos2, Rect, Vec2};

fn press(canvas: &mut CanvasController, pos: Pos2) {
    canvas.pointer_down(pos, PointerButton::Primary, Modifiers::NONE);
}

fn release(canvas: &mut CanvasController, pos: Pos2) {
    canvas.pointer_up(pos, PointerButton::Primary);
}

fn line_of(canvas: &CanvasController, id: ShapeId) -> LineShape {
    canvas
        .document()
        .get(id)
        .and_then(|s| s.as_line())
        .cloned()
        .expect("line exists")
}

/// Rectangle at (0,0,80,80) with a connector whose end was dragged onto the
/// middle of its right edge.
fn bound_scene() -> (CanvasController, ShapeId, ShapeId) {
    let mut canvas = CanvasController::default();
    let rect = canvas.create_shape(ShapeKind::Rectangle, Pos2::new(0.0, 0.0));
    let line = canvas.create_shape(ShapeKind::Line, Pos2::new(200.0, 0.0));

    press(&mut canvas, Pos2::new(280.0, 0.0));
    canvas.pointer_move(Pos2::new(90.0, 40.0));
    assert!(line_of(&canvas, line).binding(Endpoint::End).is_none());
    canvas.pointer_move(Pos2::new(83.0, 41.0));
    release(&mut canvas, Pos2::new(83.0, 41.0));

    (canvas, rect, line)
}

#[test]
fn dragged_endpoint_snaps_to_magnetic_point() {
    let (canvas, rect, line) = bound_scene();
    let line = line_of(&canvas, line);

    assert_eq!(line.end(), Pos2::new(80.0, 40.0));
    assert_eq!(
        line.binding(Endpoint::End),
        Some(EndpointBinding {
            target: rect,
            magnetic_index: 7,
        })
    );
    assert_eq!(line.start(), Pos2::new(200.0, 0.0));
    assert!(line.binding(Endpoint::Start).is_none());
}

#[test]
fn bound_endpoint_follows_moved_target() {
    let (mut canvas, rect, line) = bound_scene();

    press(&mut canvas, Pos2::new(40.0, 40.0));
    assert_eq!(canvas.primary_id(), Some(rect));
    canvas.pointer_move(Pos2::new(50.0, 50.0));
    release(&mut canvas, Pos2::new(50.0, 50.0));

    let line = line_of(&canvas, line);
    assert_eq!(line.end(), Pos2::new(90.0, 50.0));
    assert_eq!(line.start(), Pos2::new(200.0, 0.0));
    assert!(line.binding(Endpoint::End).is_some());
}

#[test]
fn deleting_target_clears_binding_and_keeps_position() {
    let (mut canvas, rect, line) = bound_scene();

    press(&mut canvas, Pos2::new(40.0, 40.0));
    canvas.pointer_move(Pos2::new(50.0, 50.0));
    release(&mut canvas, Pos2::new(50.0, 50.0));
    canvas.delete_selected();

    assert!(!canvas.document().contains(rect));
    let line = line_of(&canvas, line);
    assert!(line.binding(Endpoint::End).is_none());
    assert_eq!(line.end(), Pos2::new(90.0, 50.0));
}

#[test]
fn replacement_shape_at_old_spot_does_not_capture_endpoint() {
    let (mut canvas, rect, line) = bound_scene();
    press(&mut canvas, Pos2::new(40.0, 40.0));
    canvas.pointer_move(Pos2::new(50.0, 50.0));
    release(&mut canvas, Pos2::new(50.0, 50.0));
    canvas.delete_selected();

    let replacement = canvas.create_shape(ShapeKind::Rectangle, Pos2::new(10.0, 10.0));
    assert_ne!(replacement, rect);
    press(&mut canvas, Pos2::new(50.0, 50.0));
    canvas.pointer_move(Pos2::new(70.0, 70.0));
    release(&mut canvas, Pos2::new(70.0, 70.0));

    let line = line_of(&canvas, line);
    assert!(line.binding(Endpoint::End).is_none());
    assert_eq!(line.end(), Pos2::new(90.0, 50.0));
}

#[test]
fn nudging_bound_line_translates_it_whole() {
    let (mut canvas, _, line) = bound_scene();
    assert_eq!(canvas.primary_id(), Some(line));

    canvas.nudge(Vec2::new(10.0, 0.0));

    let line = line_of(&canvas, line);
    assert_eq!(line.start(), Pos2::new(210.0, 0.0));
    assert_eq!(line.end(), Pos2::new(90.0, 40.0));
    assert!(line.binding(Endpoint::End).is_none());
}

#[test]
fn nudging_target_drags_bound_endpoint() {
    let (mut canvas, rect, line) = bound_scene();
    canvas.clear_selection();
    press(&mut canvas, Pos2::new(40.0, 40.0));
    release(&mut canvas, Pos2::new(40.0, 40.0));
    assert_eq!(canvas.primary_id(), Some(rect));

    canvas.nudge(Vec2::new(0.0, 10.0));

    let line = line_of(&canvas, line);
    assert_eq!(line.end(), Pos2::new(80.0, 50.0));
    assert!(line.binding(Endpoint::End).is_some());
}

#[test]
fn dragging_endpoint_away_unbinds() {
    let (mut canvas, _, line) = bound_scene();

    press(&mut canvas, Pos2::new(80.0, 40.0));
    canvas.pointer_move(Pos2::new(120.0, 120.0));
    release(&mut canvas, Pos2::new(120.0, 120.0));

    let line = line_of(&canvas, line);
    assert!(line.binding(Endpoint::End).is_none());
    assert_eq!(line.end(), Pos2::new(120.0, 120.0));
}

#[test]
fn binding_follows_rotation_of_target() {
    let (mut canvas, rect, line) = bound_scene();
    canvas.clear_selection();
    press(&mut canvas, Pos2::new(40.0, 40.0));
    release(&mut canvas, Pos2::new(40.0, 40.0));
    assert_eq!(canvas.primary_id(), Some(rect));

    canvas.set_rotation(90.0);

    // The right edge midpoint turns to the bottom edge midpoint
    let end = line_of(&canvas, line).end();
    assert!((end.x - 40.0).abs() < 0.01);
    assert!((end.y - 80.0).abs() < 0.01);
}

#[test]
fn undo_restores_binding_and_position() {
    let (mut canvas, _, line) = bound_scene();
    press(&mut canvas, Pos2::new(40.0, 40.0));
    canvas.pointer_move(Pos2::new(50.0, 50.0));
    release(&mut canvas, Pos2::new(50.0, 50.0));
    canvas.delete_selected();

    canvas.undo();

    let line = line_of(&canvas, line);
    assert!(line.binding(Endpoint::End).is_some());
    assert_eq!(line.end(), Pos2::new(90.0, 50.0));
}

#[test]
fn chained_connectors_settle_in_one_update() {
    let rect = factory::create_polygon(
        Outline::Rectangle,
        Rect::from_min_size(Pos2::ZERO, Vec2::splat(80.0)),
    );
    let rect_id = rect.id();
    let mut first = factory::create_line(LineHead::Plain, Pos2::new(200.0, 0.0), Pos2::new(80.0, 40.0));
    let first_id = first.id();
    first.as_line_mut().expect("line").set_binding(
        Endpoint::End,
        Some(EndpointBinding {
            target: rect_id,
            magnetic_index: 7,
        }),
    );
    let mut second = factory::create_line(LineHead::Arrow, Pos2::new(300.0, 300.0), Pos2::new(80.0, 40.0));
    second.as_line_mut().expect("line").set_binding(
        Endpoint::End,
        Some(EndpointBinding {
            target: first_id,
            magnetic_index: 1,
        }),
    );

    // The second connector is listed before the one it is bound to
    let mut shapes: Vec<ShapeType> = vec![second, rect, first];
    shapes[1].move_by(Vec2::new(0.0, 20.0));
    binding::update_all_line_bindings(&mut shapes);

    assert_eq!(shapes[2].as_line().expect("line").end(), Pos2::new(80.0, 60.0));
    assert_eq!(shapes[0].as_line().expect("line").end(), Pos2::new(80.0, 60.0));
    assert_eq!(shapes[0].as_line().expect("line").start(), Pos2::new(300.0, 300.0));
}

#[test]
fn snapping_ignores_the_dragged_line_and_far_points() {
    let rect = factory::create_polygon(
        Outline::Rectangle,
        Rect::from_min_size(Pos2::ZERO, Vec2::splat(80.0)),
    );
    let line = factory::create_line(LineHead::Plain, Pos2::new(100.0, 40.0), Pos2::new(150.0, 40.0));
    let line_id = line.id();
    let shapes = vec![rect, line];

    let near = binding::snap_target(&shapes, line_id, Pos2::new(84.0, 40.0), 8.0);
    assert_eq!(near.map(|t| t.point), Some(Pos2::new(80.0, 40.0)));

    // Exactly at the range boundary does not snap
    assert!(binding::snap_target(&shapes, line_id, Pos2::new(88.0, 40.0), 8.0).is_none());

    // The line's own start point is not a candidate
    assert!(binding::snap_target(&shapes, line_id, Pos2::new(101.0, 40.0), 8.0).is_none());
}
