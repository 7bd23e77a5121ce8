use egui::{Modifiers, PointerButton, Pos2};

use crate::config::CanvasConfig;
use crate::document::Document;
use crate::id_generator::ShapeId;

mod selection_tool;

pub use selection_tool::{InteractionState, SelectionTool};

/// What a tool may touch while handling pointer input.
pub struct ToolContext<'a> {
    pub document: &'a mut Document,
    /// Primary selection; must name a shape in `document` when set.
    pub primary: &'a mut Option<ShapeId>,
    pub config: &'a CanvasConfig,
}

impl ToolContext<'_> {
    pub fn select_only(&mut self, id: ShapeId) {
        self.document.clear_selection();
        self.document.set_selected(id, true);
        *self.primary = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.document.clear_selection();
        *self.primary = None;
    }
}

/// Tool trait defines the interface for canvas pointer tools
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Handle pointer press on the canvas.
    fn on_pointer_down(
        &mut self,
        ctx: &mut ToolContext<'_>,
        pos: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
    );

    /// Handle pointer movement. Returns true when shapes changed.
    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, pos: Pos2) -> bool;

    /// Handle pointer release on the canvas.
    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, pos: Pos2, button: PointerButton);
}
