use std::path::PathBuf;

use egui::{Color32, Pos2, Ui};

use crate::canvas::CanvasController;
use crate::command::Command;
use crate::shape::{BorderStyle, HorizontalAlign, Shape, ShapeKind, VerticalAlign};
use crate::DiagramApp;

const FONT_FAMILIES: [&str; 4] = ["Arial", "Times New Roman", "Courier New", "Monospace"];

/// Where the palette drops new shapes, in page coordinates.
const NEW_SHAPE_POS: Pos2 = Pos2::new(100.0, 100.0);

pub fn tools_panel(app: &mut DiagramApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                file_section(app, ui);
                ui.separator();

                ui.heading("Shapes");
                ui.horizontal_wrapped(|ui| {
                    for kind in ShapeKind::ALL {
                        let command = Command::CreateShape {
                            kind,
                            pos: NEW_SHAPE_POS,
                        };
                        command_button(ui, &mut app.canvas, command);
                    }
                });
                ui.separator();

                ui.heading("Edit");
                ui.horizontal_wrapped(|ui| {
                    for command in [
                        Command::Undo,
                        Command::Redo,
                        Command::Copy,
                        Command::Cut,
                        Command::Paste(None),
                        Command::Duplicate,
                        Command::Delete,
                        Command::SelectAll,
                    ] {
                        command_button(ui, &mut app.canvas, command);
                    }
                });
                ui.horizontal_wrapped(|ui| {
                    for command in [
                        Command::BringToFront,
                        Command::BringForward,
                        Command::SendBackward,
                        Command::SendToBack,
                    ] {
                        command_button(ui, &mut app.canvas, command);
                    }
                });
                let history = app.canvas.history();
                ui.label(format!(
                    "Undo stack: {}  Redo stack: {}",
                    history.undo_len(),
                    history.redo_len()
                ));
                ui.separator();

                if app.canvas.primary_shape().is_some() {
                    ui.heading("Style");
                    style_section(&mut app.canvas, ui);
                    ui.separator();

                    ui.heading("Text");
                    text_section(&mut app.canvas, ui);
                    ui.separator();
                }

                ui.heading("Page");
                page_section(&mut app.canvas, ui);
            });
        });
}

fn command_button(ui: &mut Ui, canvas: &mut CanvasController, command: Command) {
    let enabled = command.is_enabled(canvas);
    if ui.add_enabled(enabled, egui::Button::new(command.label())).clicked() {
        log::info!("Command from UI: {}", command.label());
        command.execute(canvas);
    }
}

fn file_section(app: &mut DiagramApp, ui: &mut Ui) {
    ui.heading("File");
    let title = match app.canvas.file_path() {
        Some(path) => path.display().to_string(),
        None => "Untitled".to_owned(),
    };
    let marker = if app.canvas.is_modified() { " *" } else { "" };
    ui.label(format!("{title}{marker}"));

    ui.text_edit_singleline(&mut app.path_input);
    ui.horizontal(|ui| {
        if ui.button("New").clicked() {
            app.canvas.new_document();
            app.status = None;
        }
        let has_path = !app.path_input.trim().is_empty();
        if ui.add_enabled(has_path, egui::Button::new("Save")).clicked() {
            let path = PathBuf::from(app.path_input.trim());
            app.status = Some(match app.canvas.save(&path) {
                Ok(()) => format!("Saved {}", path.display()),
                Err(e) => format!("Save failed: {e}"),
            });
        }
        if ui.add_enabled(has_path, egui::Button::new("Load")).clicked() {
            let path = PathBuf::from(app.path_input.trim());
            app.status = Some(match app.canvas.load(&path) {
                Ok(()) => format!("Loaded {}", path.display()),
                Err(e) => format!("Load failed: {e}"),
            });
        }
    });
    if let Some(status) = &app.status {
        ui.small(status.as_str());
    }
}

fn style_section(canvas: &mut CanvasController, ui: &mut Ui) {
    let Some(shape) = canvas.primary_shape() else {
        return;
    };
    let style = shape.style().clone();
    let can_rotate = shape.can_rotate();
    let mut rotation = shape.rotation();

    let mut pen_width = style.pen_width();
    ui.horizontal(|ui| {
        ui.label("Pen width");
        if ui
            .add(egui::DragValue::new(&mut pen_width).range(1..=50))
            .changed()
        {
            canvas.set_pen_width(pen_width);
        }
    });

    let mut border_color = style.border_color;
    ui.horizontal(|ui| {
        ui.label("Border");
        if ui.color_edit_button_srgba(&mut border_color).changed() {
            canvas.set_border_color(border_color);
        }
    });

    let mut fill_color = style.fill_color;
    ui.horizontal(|ui| {
        ui.label("Fill");
        if ui.color_edit_button_srgba(&mut fill_color).changed() {
            canvas.set_fill_color(fill_color);
        }
    });

    let mut border_style = style.border_style;
    egui::ComboBox::from_label("Border style")
        .selected_text(border_style.as_str())
        .show_ui(ui, |ui| {
            for option in BorderStyle::ALL {
                ui.selectable_value(&mut border_style, option, option.as_str());
            }
        });
    if border_style != style.border_style {
        canvas.set_border_style(border_style);
    }

    if can_rotate {
        let slider = egui::Slider::new(&mut rotation, -180.0..=180.0).text("Rotation");
        if ui.add(slider).changed() {
            canvas.set_rotation(rotation);
        }
    }
}

fn text_section(canvas: &mut CanvasController, ui: &mut Ui) {
    let Some(shape) = canvas.primary_shape() else {
        return;
    };
    let text = shape.text_style().clone();

    let mut content = text.text.clone();
    if ui.text_edit_multiline(&mut content).changed() {
        canvas.set_text(&content);
    }

    let mut family = text.font_family.clone();
    egui::ComboBox::from_label("Font")
        .selected_text(family.as_str())
        .show_ui(ui, |ui| {
            for option in FONT_FAMILIES {
                ui.selectable_value(&mut family, option.to_owned(), option);
            }
        });
    if family != text.font_family {
        canvas.set_font_family(&family);
    }

    let mut size = text.font_size();
    ui.horizontal(|ui| {
        ui.label("Size");
        if ui.add(egui::DragValue::new(&mut size).range(1..=96)).changed() {
            canvas.set_font_size(size);
        }
        let mut color = text.font_color;
        if ui.color_edit_button_srgba(&mut color).changed() {
            canvas.set_font_color(color);
        }
    });

    ui.horizontal(|ui| {
        let mut bold = text.bold;
        if ui.toggle_value(&mut bold, "B").changed() {
            canvas.set_font_bold(bold);
        }
        let mut italic = text.italic;
        if ui.toggle_value(&mut italic, "I").changed() {
            canvas.set_font_italic(italic);
        }
        let mut underline = text.underline;
        if ui.toggle_value(&mut underline, "U").changed() {
            canvas.set_font_underline(underline);
        }
    });

    let mut alignment = text.alignment;
    ui.horizontal(|ui| {
        for (option, label) in [
            (HorizontalAlign::Left, "Left"),
            (HorizontalAlign::Center, "Center"),
            (HorizontalAlign::Right, "Right"),
        ] {
            ui.selectable_value(&mut alignment.horizontal, option, label);
        }
    });
    ui.horizontal(|ui| {
        for (option, label) in [
            (VerticalAlign::Top, "Top"),
            (VerticalAlign::Center, "Middle"),
            (VerticalAlign::Bottom, "Bottom"),
        ] {
            ui.selectable_value(&mut alignment.vertical, option, label);
        }
    });
    if alignment != text.alignment {
        canvas.set_text_alignment(alignment);
    }
}

fn page_section(canvas: &mut CanvasController, ui: &mut Ui) {
    let page = canvas.document().page.clone();

    let mut background: Color32 = page.background;
    ui.horizontal(|ui| {
        ui.label("Background");
        if ui.color_edit_button_srgba(&mut background).changed() {
            canvas.set_background_color(background);
        }
    });

    let mut size = page.size;
    ui.horizontal(|ui| {
        ui.label("Size");
        let w = ui.add(egui::DragValue::new(&mut size.x).range(100.0..=10000.0));
        let h = ui.add(egui::DragValue::new(&mut size.y).range(100.0..=10000.0));
        if w.changed() || h.changed() {
            canvas.set_page_size(size);
        }
    });

    let mut landscape = page.landscape;
    if ui.checkbox(&mut landscape, "Landscape").changed() {
        canvas.set_landscape(landscape);
    }
    let mut grid = page.grid_visible;
    if ui.checkbox(&mut grid, "Show grid").changed() {
        canvas.set_grid_visible(grid);
    }
}
