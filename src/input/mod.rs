use egui::{Context, Modifiers, PointerButton, Pos2, Response, Vec2};

/// Pointer input on the canvas, in page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown {
        pos: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
    },
    /// Mouse moved (with or without buttons pressed)
    PointerMove { pos: Pos2 },
    /// Mouse button was released
    PointerUp { pos: Pos2, button: PointerButton },
    /// Primary button double click, reported after its release
    DoubleClick { pos: Pos2 },
}

const BUTTONS: [PointerButton; 2] = [PointerButton::Primary, PointerButton::Secondary];

/// Handles converting raw egui input into canvas InputEvents
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    /// A press started on the canvas and has not been released yet.
    gesture_active: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect this frame's events. `origin` is the screen position of the
    /// page's top-left corner.
    pub fn process_input(&mut self, ctx: &Context, response: &Response, origin: Vec2) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let to_page = |pos: Pos2| pos - origin;

        ctx.input(|input| {
            let Some(screen_pos) = input.pointer.interact_pos() else {
                self.last_pointer_pos = None;
                return;
            };
            let pos = to_page(screen_pos);
            let on_canvas = response.hovered();

            if self.last_pointer_pos != Some(pos) && (on_canvas || self.gesture_active) {
                events.push(InputEvent::PointerMove { pos });
            }
            self.last_pointer_pos = Some(pos);

            for button in BUTTONS {
                if input.pointer.button_pressed(button) && response.hovered() {
                    self.gesture_active = true;
                    events.push(InputEvent::PointerDown {
                        pos,
                        button,
                        modifiers: input.modifiers,
                    });
                }
            }

            for button in BUTTONS {
                if input.pointer.button_released(button) && self.gesture_active {
                    events.push(InputEvent::PointerUp { pos, button });
                    if button == PointerButton::Primary
                        && input.pointer.button_double_clicked(PointerButton::Primary)
                    {
                        events.push(InputEvent::DoubleClick { pos });
                    }
                }
            }

            if !input.pointer.any_down() {
                self.gesture_active = false;
            }
        });

        events
    }
}
