use egui::emath::TSTransform;
use egui::{Color32, Event, Id, Key, LayerId, Modifiers, Painter, PointerButton, Sense, Ui, Vec2};

use crate::command::Command;
use crate::input::InputEvent;
use crate::DiagramApp;

/// Gap between the page and the edge of the scroll area.
const PAGE_MARGIN: f32 = 24.0;
const NUDGE_STEP: f32 = 1.0;
const NUDGE_STEP_LARGE: f32 = 10.0;

pub fn central_panel(app: &mut DiagramApp, ctx: &egui::Context) {
    handle_shortcuts(app, ctx);

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(Color32::from_gray(200)))
        .show(ctx, |ui| {
            let page_size = app.canvas.document().page.effective_size();
            egui::ScrollArea::both().show(ui, |ui| {
                let (response, _) = ui.allocate_painter(
                    page_size + Vec2::splat(2.0 * PAGE_MARGIN),
                    Sense::click_and_drag(),
                );
                let origin = response.rect.min.to_vec2() + Vec2::splat(PAGE_MARGIN);

                for event in app.input.process_input(ctx, &response, origin) {
                    match event {
                        InputEvent::DoubleClick { pos } => {
                            if let Some(text) = app.canvas.double_click(pos) {
                                app.text_buffer = text;
                            }
                        }
                        InputEvent::PointerDown {
                            pos,
                            button: PointerButton::Secondary,
                            ..
                        } => {
                            app.context_pos = Some(pos);
                            app.canvas.handle_input(&event);
                        }
                        _ => app.canvas.handle_input(&event),
                    }
                }

                // Shapes are painted in page coordinates on a translated sublayer
                let page_layer = LayerId::new(ui.layer_id().order, Id::new("diagram_page"));
                ctx.set_sublayer(ui.layer_id(), page_layer);
                ctx.set_transform_layer(page_layer, TSTransform::from_translation(origin));
                let clip = ui.clip_rect().intersect(response.rect).translate(-origin);
                let painter = Painter::new(ctx.clone(), page_layer, clip);
                app.renderer.render(&painter, &app.canvas);

                response.context_menu(|ui| context_menu(app, ui));
            });
        });

    text_edit_window(app, ctx);
}

fn context_menu(app: &mut DiagramApp, ui: &mut Ui) {
    let Some(pos) = app.context_pos else {
        ui.close_menu();
        return;
    };
    for command in Command::context_menu(&app.canvas, pos) {
        let label = match command {
            Command::Paste(Some(_)) => "Paste here",
            _ => command.label(),
        };
        let enabled = command.is_enabled(&app.canvas);
        if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
            log::info!("Context menu: {label}");
            command.execute(&mut app.canvas);
            ui.close_menu();
        }
    }
}

fn text_edit_window(app: &mut DiagramApp, ctx: &egui::Context) {
    if app.canvas.editing_text().is_none() {
        return;
    }

    let mut commit = false;
    let mut cancel = false;
    egui::Window::new("Edit text")
        .order(egui::Order::Foreground)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.text_edit_multiline(&mut app.text_buffer).request_focus();
            ui.horizontal(|ui| {
                commit = ui.button("OK").clicked();
                cancel = ui.button("Cancel").clicked();
            });
        });

    if ctx.input(|i| i.key_pressed(Key::Escape)) {
        cancel = true;
    }
    if commit {
        app.canvas.commit_text(std::mem::take(&mut app.text_buffer));
    } else if cancel {
        app.canvas.cancel_text_edit();
        app.text_buffer.clear();
    }
}

fn handle_shortcuts(app: &mut DiagramApp, ctx: &egui::Context) {
    if ctx.wants_keyboard_input() || app.canvas.editing_text().is_some() {
        return;
    }

    let mut commands = Vec::new();
    ctx.input_mut(|input| {
        // Clipboard keys arrive as dedicated events rather than key presses
        for event in &input.events {
            match event {
                Event::Copy => commands.push(Command::Copy),
                Event::Cut => commands.push(Command::Cut),
                Event::Paste(_) => commands.push(Command::Paste(None)),
                _ => {}
            }
        }

        let shortcuts = [
            (Modifiers::COMMAND | Modifiers::SHIFT, Key::Z, Command::Redo),
            (Modifiers::COMMAND, Key::Z, Command::Undo),
            (Modifiers::COMMAND, Key::Y, Command::Redo),
            (Modifiers::COMMAND, Key::D, Command::Duplicate),
            (Modifiers::COMMAND, Key::A, Command::SelectAll),
            (Modifiers::NONE, Key::Delete, Command::Delete),
            (Modifiers::NONE, Key::Backspace, Command::Delete),
        ];
        for (modifiers, key, command) in shortcuts {
            if input.consume_key(modifiers, key) {
                commands.push(command);
            }
        }
    });

    for command in commands {
        if command.is_enabled(&app.canvas) {
            log::debug!("Shortcut: {}", command.label());
            command.execute(&mut app.canvas);
        }
    }

    let nudge = ctx.input(|input| {
        let step = if input.modifiers.shift {
            NUDGE_STEP_LARGE
        } else {
            NUDGE_STEP
        };
        let mut delta = Vec2::ZERO;
        if input.key_pressed(Key::ArrowLeft) {
            delta.x -= step;
        }
        if input.key_pressed(Key::ArrowRight) {
            delta.x += step;
        }
        if input.key_pressed(Key::ArrowUp) {
            delta.y -= step;
        }
        if input.key_pressed(Key::ArrowDown) {
            delta.y += step;
        }
        delta
    });
    if nudge != Vec2::ZERO {
        app.canvas.nudge(nudge);
    }
}
