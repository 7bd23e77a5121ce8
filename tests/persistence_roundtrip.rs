use eframe_diagram::binding::Endpoint;
use eframe_diagram::id_generator::generate_id;
use eframe_diagram::persistence::{self, from_xml_str, to_xml_string, PersistenceError};
use eframe_diagram::shape::{BorderStyle, HorizontalAlign, TextAlignment, VerticalAlign};
use eframe_diagram::{CanvasController, Shape, ShapeId, ShapeKind};
use egui::{Color32, Modifiers, PointerButton, Pos2};

/// A styled, rotated rectangle, an ellipse and an arrow bound to the
/// rectangle, on a landscape page.
fn sample_canvas() -> (CanvasController, ShapeId, ShapeId) {
    let mut canvas = CanvasController::default();

    let rect = canvas.create_shape(ShapeKind::Rectangle, Pos2::new(100.0, 100.0));
    canvas.set_fill_color(Color32::from_rgb(200, 30, 40));
    canvas.set_border_style(BorderStyle::DashDot);
    canvas.set_pen_width(3);
    canvas.set_text("Start & <end> \"quoted\"");
    canvas.set_font_family("Courier New");
    canvas.set_font_size(14);
    canvas.set_font_bold(true);
    canvas.set_font_underline(true);
    canvas.set_font_color(Color32::from_rgb(0, 0, 255));
    canvas.set_text_alignment(TextAlignment {
        horizontal: HorizontalAlign::Left,
        vertical: VerticalAlign::Top,
    });
    canvas.set_rotation(30.0);

    canvas.create_shape(ShapeKind::Ellipse, Pos2::new(400.0, 100.0));

    let arrow = canvas.create_shape(ShapeKind::Arrow, Pos2::new(300.0, 400.0));
    canvas.pointer_down(Pos2::new(380.0, 400.0), PointerButton::Primary, Modifiers::NONE);
    let target = canvas.document().get(rect).expect("rect").magnetic_points()[5];
    canvas.pointer_move(target + egui::vec2(2.0, 2.0));
    canvas.pointer_up(target, PointerButton::Primary);

    canvas.set_landscape(true);
    canvas.set_background_color(Color32::from_rgb(250, 250, 240));
    canvas.clear_selection();
    (canvas, rect, arrow)
}

#[test]
fn sample_arrow_is_bound_before_saving() {
    let (canvas, rect, arrow) = sample_canvas();
    let line = canvas.document().get(arrow).and_then(|s| s.as_line()).expect("arrow");
    assert_eq!(line.binding(Endpoint::End).map(|b| b.target), Some(rect));
}

#[test]
fn save_and_load_round_trip() {
    let (mut canvas, _, arrow) = sample_canvas();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("diagram.svg");

    canvas.save(&path).expect("save");
    assert!(!canvas.is_modified());
    assert_eq!(canvas.file_path(), Some(path.as_path()));

    let mut loaded = CanvasController::default();
    loaded.load(&path).expect("load");

    assert_eq!(loaded.document().shapes(), canvas.document().shapes());
    assert_eq!(loaded.document().page.background, Color32::from_rgb(250, 250, 240));
    assert!(loaded.document().page.landscape);
    assert_eq!(loaded.document().page.size, canvas.document().page.size);
    assert!(!loaded.is_modified());
    assert!(!loaded.can_undo());

    let line = loaded.document().get(arrow).and_then(|s| s.as_line()).expect("arrow");
    assert!(line.binding(Endpoint::End).is_some());
}

#[test]
fn written_document_has_svg_root_and_shape_elements() {
    let (canvas, _, _) = sample_canvas();
    let xml = to_xml_string(canvas.document()).expect("serialize");

    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(xml.contains("width=\"1500\""));
    assert!(xml.contains("height=\"1050\""));
    assert_eq!(xml.matches("<shape ").count(), 3);
    assert!(xml.contains("type=\"Rect\""));
    assert!(xml.contains("type=\"Ellipse\""));
    assert!(xml.contains("type=\"Arrow\""));
    assert!(xml.contains("borderStyle=\"dash-dot\""));
    assert!(xml.contains("textAlignment=\"left-top\""));
    assert!(xml.contains("fillColor=\"#c81e28\""));
    assert!(xml.contains("&amp;"));
}

#[test]
fn unknown_shape_type_rejects_the_whole_file() {
    let (canvas, _, _) = sample_canvas();
    let xml = to_xml_string(canvas.document())
        .expect("serialize")
        .replace("type=\"Ellipse\"", "type=\"Star\"");

    let err = from_xml_str(&xml).unwrap_err();
    assert!(matches!(err, PersistenceError::UnknownShapeType(ref t) if t == "Star"));
}

#[test]
fn failed_load_leaves_current_document_untouched() {
    let (source, _, _) = sample_canvas();
    let xml = to_xml_string(source.document())
        .expect("serialize")
        .replace("penWidth=\"3\"", "penWidth=\"thick\"");
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.svg");
    std::fs::write(&path, xml).expect("write");

    let mut canvas = CanvasController::default();
    let kept = canvas.create_shape(ShapeKind::Diamond, Pos2::new(0.0, 0.0));

    let err = canvas.load(&path).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::InvalidValue {
            attribute: "penWidth",
            ..
        }
    ));
    assert_eq!(canvas.document().len(), 1);
    assert!(canvas.document().contains(kept));
    assert_eq!(canvas.file_path(), None);
    assert!(canvas.can_undo());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = persistence::load_from_file(&dir.path().join("absent.svg")).unwrap_err();
    assert!(matches!(err, PersistenceError::Io(_)));
}

#[test]
fn wrong_root_element_is_rejected() {
    let err = from_xml_str("<?xml version=\"1.0\"?><diagram></diagram>").unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidRoot(ref name) if name == "diagram"));
}

#[test]
fn missing_attribute_is_rejected() {
    let (canvas, _, _) = sample_canvas();
    let xml = to_xml_string(canvas.document())
        .expect("serialize")
        .replace("fontFamily=\"Courier New\"", "");

    let err = from_xml_str(&xml).unwrap_err();
    assert!(matches!(err, PersistenceError::MissingAttribute("fontFamily")));
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut canvas = CanvasController::default();
    let a = canvas.create_shape(ShapeKind::Rectangle, Pos2::new(0.0, 0.0));
    let b = canvas.create_shape(ShapeKind::Rectangle, Pos2::new(100.0, 0.0));
    let xml = to_xml_string(canvas.document())
        .expect("serialize")
        .replace(&b.to_string(), &a.to_string());

    let err = from_xml_str(&xml).unwrap_err();
    assert!(matches!(err, PersistenceError::DuplicateId(id) if id == a));
}

#[test]
fn binding_to_missing_shape_is_dropped_on_load() {
    let (canvas, rect, arrow) = sample_canvas();
    let xml = to_xml_string(canvas.document()).expect("serialize").replace(
        &format!("endTarget=\"{rect}\""),
        &format!("endTarget=\"{}\"", generate_id()),
    );

    let document = from_xml_str(&xml).expect("stale bindings are not fatal");
    let line = document.get(arrow).and_then(|s| s.as_line()).expect("arrow");
    assert!(line.binding(Endpoint::End).is_none());
    assert_eq!(
        line.end(),
        canvas.document().get(arrow).and_then(|s| s.as_line()).expect("arrow").end()
    );
}

#[test]
fn loading_keeps_the_grid_preference() {
    let (mut canvas, _, _) = sample_canvas();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("grid.svg");
    canvas.save(&path).expect("save");

    let mut loaded = CanvasController::default();
    loaded.set_grid_visible(false);
    loaded.load(&path).expect("load");
    assert!(!loaded.document().page.grid_visible);
}

#[test]
fn new_document_keeps_page_but_drops_shapes_and_history() {
    let (mut canvas, _, _) = sample_canvas();
    canvas.new_document();
    assert!(canvas.document().is_empty());
    assert!(!canvas.can_undo());
    assert!(!canvas.is_modified());
    assert!(canvas.document().page.landscape);
}
