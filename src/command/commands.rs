use egui::Pos2;

use crate::canvas::CanvasController;
use crate::shape::ShapeKind;

/// Edit actions triggered from menus, buttons and keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Drop a new shape with its top-left (or start point) at `pos`
    CreateShape { kind: ShapeKind, pos: Pos2 },
    Undo,
    Redo,
    Copy,
    Cut,
    /// Paste at a point, or next to the selection when `None`
    Paste(Option<Pos2>),
    Duplicate,
    Delete,
    SelectAll,
    BringToFront,
    SendToBack,
    BringForward,
    SendBackward,
}

impl Command {
    pub fn label(&self) -> &'static str {
        match self {
            Command::CreateShape { kind, .. } => kind.as_str(),
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::Copy => "Copy",
            Command::Cut => "Cut",
            Command::Paste(_) => "Paste",
            Command::Duplicate => "Duplicate",
            Command::Delete => "Delete",
            Command::SelectAll => "Select All",
            Command::BringToFront => "Bring to Front",
            Command::SendToBack => "Send to Back",
            Command::BringForward => "Bring Forward",
            Command::SendBackward => "Send Backward",
        }
    }

    /// Whether executing the command would do anything right now.
    pub fn is_enabled(&self, canvas: &CanvasController) -> bool {
        match self {
            Command::CreateShape { .. } => true,
            Command::Undo => canvas.can_undo(),
            Command::Redo => canvas.can_redo(),
            Command::Copy => canvas.can_copy(),
            Command::Cut => canvas.can_cut(),
            Command::Paste(_) => canvas.can_paste(),
            Command::Duplicate => canvas.can_duplicate(),
            Command::Delete => canvas.can_delete(),
            Command::SelectAll => !canvas.document().is_empty(),
            Command::BringToFront => canvas.can_bring_to_front(),
            Command::SendToBack => canvas.can_send_to_back(),
            Command::BringForward => canvas.can_bring_forward(),
            Command::SendBackward => canvas.can_send_backward(),
        }
    }

    /// Entries of the right-click menu opened at `pos`. A shape under the
    /// pointer gets the clipboard actions, blank canvas gets history, paste
    /// at the pointer and select all.
    pub fn context_menu(canvas: &CanvasController, pos: Pos2) -> Vec<Command> {
        if canvas.document().shape_at(pos).is_some() {
            vec![
                Command::Copy,
                Command::Cut,
                Command::Paste(None),
                Command::Duplicate,
                Command::Delete,
            ]
        } else {
            vec![
                Command::Undo,
                Command::Redo,
                Command::Paste(Some(pos)),
                Command::SelectAll,
            ]
        }
    }

    /// Execute the command against the canvas
    pub fn execute(&self, canvas: &mut CanvasController) {
        log::debug!("Executing {:?}", self);
        match *self {
            Command::CreateShape { kind, pos } => {
                canvas.create_shape(kind, pos);
            }
            Command::Undo => canvas.undo(),
            Command::Redo => canvas.redo(),
            Command::Copy => canvas.copy(),
            Command::Cut => canvas.cut(),
            Command::Paste(Some(pos)) => canvas.paste_at(pos),
            Command::Paste(None) => canvas.paste(),
            Command::Duplicate => canvas.duplicate(),
            Command::Delete => canvas.delete_selected(),
            Command::SelectAll => canvas.select_all(),
            Command::BringToFront => canvas.bring_to_front(),
            Command::SendToBack => canvas.send_to_back(),
            Command::BringForward => canvas.bring_forward(),
            Command::SendBackward => canvas.send_backward(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use egui::{Modifiers, PointerButton};

    fn canvas_with_rect() -> CanvasController {
        let mut canvas = CanvasController::default();
        canvas.create_shape(ShapeKind::Rectangle, Pos2::ZERO);
        canvas
    }

    #[test]
    fn shape_menu_offers_clipboard_actions() {
        let canvas = canvas_with_rect();
        let entries = Command::context_menu(&canvas, Pos2::new(40.0, 40.0));
        assert_eq!(
            entries,
            vec![
                Command::Copy,
                Command::Cut,
                Command::Paste(None),
                Command::Duplicate,
                Command::Delete,
            ]
        );
    }

    #[test]
    fn blank_menu_pastes_at_the_press_position() {
        let mut canvas = canvas_with_rect();
        canvas.copy();
        let pos = Pos2::new(300.0, 200.0);
        canvas.pointer_down(pos, PointerButton::Secondary, Modifiers::NONE);
        canvas.pointer_up(pos, PointerButton::Secondary);

        let entries = Command::context_menu(&canvas, pos);
        assert_eq!(
            entries,
            vec![
                Command::Undo,
                Command::Redo,
                Command::Paste(Some(pos)),
                Command::SelectAll,
            ]
        );
        assert!(!Command::Redo.is_enabled(&canvas));

        let paste = entries[2];
        assert!(paste.is_enabled(&canvas));
        paste.execute(&mut canvas);
        assert_eq!(canvas.document().len(), 2);
        let pasted = canvas.primary_shape().map(|s| s.bounding_rect().min);
        assert_eq!(pasted, Some(pos + canvas.config().paste_offset));
    }

    #[test]
    fn clipboard_entries_disabled_without_clipboard() {
        let canvas = canvas_with_rect();
        assert!(Command::Copy.is_enabled(&canvas));
        assert!(!Command::Paste(None).is_enabled(&canvas));
    }
}
