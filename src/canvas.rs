use std::path::{Path, PathBuf};

use egui::{Color32, Modifiers, PointerButton, Pos2, Vec2};
use log::{debug, info, warn};

use crate::binding;
use crate::command::{Snapshot, SnapshotHistory};
use crate::config::CanvasConfig;
use crate::document::{Document, PageSettings};
use crate::id_generator::ShapeId;
use crate::input::InputEvent;
use crate::persistence::{self, PersistenceResult};
use crate::shape::{factory, BorderStyle, Shape, ShapeKind, ShapeType, TextAlignment};
use crate::tools::{InteractionState, SelectionTool, Tool, ToolContext};

/// Owns the live diagram and applies every user interaction to it.
#[derive(Debug)]
pub struct CanvasController {
    document: Document,
    primary: Option<ShapeId>,
    history: SnapshotHistory,
    clipboard: Option<ShapeType>,
    tool: SelectionTool,
    config: CanvasConfig,
    modified: bool,
    file_path: Option<PathBuf>,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl CanvasController {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            document: Document::new(),
            primary: None,
            history: SnapshotHistory::new(config.undo_limit),
            clipboard: None,
            tool: SelectionTool::new(),
            config,
            modified: false,
            file_path: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CanvasConfig) {
        self.config = config;
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn tool(&self) -> &SelectionTool {
        &self.tool
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.tool.state()
    }

    pub fn primary_id(&self) -> Option<ShapeId> {
        self.primary
    }

    pub fn primary_shape(&self) -> Option<&ShapeType> {
        self.primary.and_then(|id| self.document.get(id))
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn tool_context(&mut self) -> (&mut SelectionTool, ToolContext<'_>) {
        (
            &mut self.tool,
            ToolContext {
                document: &mut self.document,
                primary: &mut self.primary,
                config: &self.config,
            },
        )
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            shapes: self.document.shapes().to_vec(),
            primary: self.primary,
        }
    }

    /// Record the pre-mutation state for undo.
    fn save_to_undo_stack(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.document.replace_shapes(snapshot.shapes);
        self.primary = snapshot.primary.filter(|id| self.document.contains(*id));
        if let Some(id) = self.primary {
            self.document.set_selected(id, true);
        }
        binding::update_all_line_bindings(self.document.shapes_mut());
        self.tool.reset();
        self.modified = true;
    }

    // ---- pointer input ----

    pub fn handle_input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { pos, button, modifiers } => self.pointer_down(pos, button, modifiers),
            InputEvent::PointerMove { pos } => self.pointer_move(pos),
            InputEvent::PointerUp { pos, button } => self.pointer_up(pos, button),
            InputEvent::DoubleClick { pos } => {
                self.double_click(pos);
            }
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2, button: PointerButton, modifiers: Modifiers) {
        self.save_to_undo_stack();
        let (tool, mut ctx) = self.tool_context();
        tool.on_pointer_down(&mut ctx, pos, button, modifiers);
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        let (tool, mut ctx) = self.tool_context();
        if tool.on_pointer_move(&mut ctx, pos) {
            self.modified = true;
        }
    }

    pub fn pointer_up(&mut self, pos: Pos2, button: PointerButton) {
        let (tool, mut ctx) = self.tool_context();
        tool.on_pointer_up(&mut ctx, pos, button);
    }

    /// Start editing the text of the topmost shape under `pos`; returns the
    /// current text to seed the editor with.
    pub fn double_click(&mut self, pos: Pos2) -> Option<String> {
        let (tool, mut ctx) = self.tool_context();
        let id = tool.on_double_click(&mut ctx, pos)?;
        self.document.get(id).map(|s| s.text_style().text.clone())
    }

    pub fn editing_text(&self) -> Option<ShapeId> {
        self.tool.editing_text()
    }

    pub fn commit_text(&mut self, text: String) {
        let Some(id) = self.tool.editing_text() else {
            return;
        };
        self.tool.finish_text_edit();
        let Some(shape) = self.document.get(id) else {
            return;
        };
        if shape.text_style().text == text {
            return;
        }
        self.save_to_undo_stack();
        if let Some(shape) = self.document.get_mut(id) {
            shape.text_style_mut().text = text;
            self.modified = true;
        }
    }

    pub fn cancel_text_edit(&mut self) {
        self.tool.finish_text_edit();
    }

    // ---- creation and clipboard ----

    /// Drop a new shape of `kind` at `pos` and select it.
    pub fn create_shape(&mut self, kind: ShapeKind, pos: Pos2) -> ShapeId {
        self.save_to_undo_stack();
        let shape = factory::create_shape_sized(kind, pos, self.config.default_shape_size);
        info!("Created {} at {:?}", kind, pos);
        self.insert_selected(shape)
    }

    fn insert_selected(&mut self, shape: ShapeType) -> ShapeId {
        let id = shape.id();
        self.document.add_shape(shape);
        self.document.clear_selection();
        self.document.set_selected(id, true);
        self.primary = Some(id);
        self.modified = true;
        id
    }

    pub fn copy(&mut self) {
        if let Some(shape) = self.primary_shape().cloned() {
            debug!("Copied {} to clipboard", shape.id());
            self.clipboard = Some(shape);
        }
    }

    pub fn cut(&mut self) {
        if !self.can_cut() {
            return;
        }
        self.copy();
        self.save_to_undo_stack();
        if let Some(id) = self.primary {
            self.remove_shapes(&[id]);
        }
    }

    /// Paste at the center of the current selection, or at the configured
    /// default position when nothing is selected.
    pub fn paste(&mut self) {
        let pos = self
            .primary_shape()
            .map(|s| s.bounding_rect().center())
            .unwrap_or(self.config.default_paste_position);
        self.paste_at(pos);
    }

    pub fn paste_at(&mut self, pos: Pos2) {
        let Some(source) = &self.clipboard else {
            return;
        };
        let mut shape = source.clone_detached();
        let origin = shape.bounding_rect().min;
        shape.move_by(pos - origin + self.config.paste_offset);

        self.save_to_undo_stack();
        self.insert_selected(shape);
    }

    pub fn duplicate(&mut self) {
        let Some(source) = self.primary_shape() else {
            return;
        };
        let mut shape = source.clone_detached();
        shape.move_by(self.config.paste_offset);

        self.save_to_undo_stack();
        self.insert_selected(shape);
    }

    // ---- selection, deletion and ordering ----

    pub fn select_all(&mut self) {
        self.document.select_all();
        if self.primary.is_none() {
            self.primary = self.document.shapes().last().map(|s| s.id());
        }
    }

    pub fn clear_selection(&mut self) {
        self.document.clear_selection();
        self.primary = None;
    }

    /// Delete every selected shape, plus the primary one.
    pub fn delete_selected(&mut self) {
        let mut ids = self.document.selected_ids();
        if let Some(id) = self.primary {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        if ids.is_empty() {
            return;
        }
        self.save_to_undo_stack();
        self.remove_shapes(&ids);
    }

    fn remove_shapes(&mut self, ids: &[ShapeId]) {
        for &id in ids {
            binding::clear_bindings_to(self.document.shapes_mut(), id);
            if self.document.remove_shape(id).is_some() {
                info!("Deleted shape {}", id);
            }
        }
        if self.primary.is_some_and(|id| ids.contains(&id)) {
            self.primary = None;
        }
        self.tool.reset();
        self.modified = true;
    }

    fn reorder(&mut self, apply: fn(&mut Document, ShapeId) -> bool) {
        let Some(id) = self.primary else {
            return;
        };
        self.save_to_undo_stack();
        if apply(&mut self.document, id) {
            self.modified = true;
        }
    }

    pub fn bring_to_front(&mut self) {
        if self.can_bring_to_front() {
            self.reorder(Document::bring_to_front);
        }
    }

    pub fn send_to_back(&mut self) {
        if self.can_send_to_back() {
            self.reorder(Document::send_to_back);
        }
    }

    pub fn bring_forward(&mut self) {
        if self.can_bring_to_front() {
            self.reorder(Document::bring_forward);
        }
    }

    pub fn send_backward(&mut self) {
        if self.can_send_to_back() {
            self.reorder(Document::send_backward);
        }
    }

    // ---- history ----

    pub fn undo(&mut self) {
        let current = self.snapshot();
        if let Some(previous) = self.history.undo(current) {
            debug!("Undo ({} left)", self.history.undo_len());
            self.restore(previous);
        }
    }

    pub fn redo(&mut self) {
        let current = self.snapshot();
        if let Some(next) = self.history.redo(current) {
            debug!("Redo ({} left)", self.history.redo_len());
            self.restore(next);
        }
    }

    // ---- predicates ----

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn can_copy(&self) -> bool {
        self.primary_shape().is_some()
    }

    pub fn can_cut(&self) -> bool {
        self.can_copy()
    }

    pub fn can_duplicate(&self) -> bool {
        self.can_copy()
    }

    pub fn can_paste(&self) -> bool {
        self.clipboard.is_some()
    }

    pub fn can_delete(&self) -> bool {
        self.primary.is_some() || self.document.selected_count() > 0
    }

    pub fn can_bring_to_front(&self) -> bool {
        self.primary.is_some_and(|id| !self.document.is_topmost(id))
    }

    pub fn can_send_to_back(&self) -> bool {
        self.primary.is_some_and(|id| !self.document.is_bottommost(id))
    }

    pub fn can_bring_forward(&self) -> bool {
        self.can_bring_to_front()
    }

    pub fn can_send_backward(&self) -> bool {
        self.can_send_to_back()
    }

    // ---- property setters on the primary selection ----

    fn update_primary(&mut self, apply: impl FnOnce(&mut ShapeType)) {
        let Some(id) = self.primary else {
            return;
        };
        let Some(before) = self.document.get(id).cloned() else {
            return;
        };
        let mut after = before.clone();
        apply(&mut after);
        if after == before {
            return;
        }

        self.save_to_undo_stack();
        if let Some(shape) = self.document.get_mut(id) {
            *shape = after;
        }
        binding::update_all_line_bindings(self.document.shapes_mut());
        self.modified = true;
    }

    pub fn set_pen_width(&mut self, width: u32) {
        self.update_primary(|s| s.style_mut().set_pen_width(width));
    }

    pub fn set_border_color(&mut self, color: Color32) {
        self.update_primary(|s| s.style_mut().border_color = color);
    }

    pub fn set_border_style(&mut self, style: BorderStyle) {
        self.update_primary(|s| s.style_mut().border_style = style);
    }

    pub fn set_fill_color(&mut self, color: Color32) {
        self.update_primary(|s| s.style_mut().fill_color = color);
    }

    pub fn set_text(&mut self, text: &str) {
        self.update_primary(|s| s.text_style_mut().text = text.to_owned());
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.update_primary(|s| s.text_style_mut().font_family = family.to_owned());
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.update_primary(|s| s.text_style_mut().set_font_size(size));
    }

    pub fn set_font_bold(&mut self, bold: bool) {
        self.update_primary(|s| s.text_style_mut().bold = bold);
    }

    pub fn set_font_italic(&mut self, italic: bool) {
        self.update_primary(|s| s.text_style_mut().italic = italic);
    }

    pub fn set_font_underline(&mut self, underline: bool) {
        self.update_primary(|s| s.text_style_mut().underline = underline);
    }

    pub fn set_font_color(&mut self, color: Color32) {
        self.update_primary(|s| s.text_style_mut().font_color = color);
    }

    pub fn set_text_alignment(&mut self, alignment: TextAlignment) {
        self.update_primary(|s| s.text_style_mut().alignment = alignment);
    }

    /// Absolute rotation of the primary shape in degrees.
    pub fn set_rotation(&mut self, angle: f32) {
        self.update_primary(|s| {
            if s.can_rotate() {
                s.rotate(angle);
            }
        });
    }

    /// Move the primary shape by `delta`, as a single undoable step.
    pub fn nudge(&mut self, delta: Vec2) {
        let Some(id) = self.primary.filter(|id| self.document.contains(*id)) else {
            return;
        };
        if delta == Vec2::ZERO {
            return;
        }

        self.save_to_undo_stack();
        if let Some(shape) = self.document.get_mut(id) {
            shape.move_by(delta);
        }
        binding::detach_from_unmoved(self.document.shapes_mut(), &[id]);
        binding::update_all_line_bindings(self.document.shapes_mut());
        self.modified = true;
    }

    // ---- page ----

    pub fn set_background_color(&mut self, color: Color32) {
        if self.document.page.background != color {
            self.document.page.background = color;
            self.modified = true;
        }
    }

    pub fn set_page_size(&mut self, size: Vec2) {
        if self.document.page.size != size {
            self.document.page.size = size;
            self.modified = true;
        }
    }

    pub fn set_landscape(&mut self, landscape: bool) {
        if self.document.page.landscape != landscape {
            self.document.page.landscape = landscape;
            self.modified = true;
        }
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.document.page.grid_visible = visible;
    }

    /// Apply page settings kept between sessions. Not an edit of the diagram.
    pub fn restore_page(&mut self, page: PageSettings) {
        self.document.page = page;
    }

    // ---- document lifecycle ----

    pub fn new_document(&mut self) {
        self.document.clear();
        self.reset_session();
        self.file_path = None;
        info!("Started a new diagram");
    }

    fn reset_session(&mut self) {
        self.primary = None;
        self.history.clear();
        self.clipboard = None;
        self.tool.reset();
        self.modified = false;
    }

    pub fn save(&mut self, path: &Path) -> PersistenceResult<()> {
        persistence::save_to_file(&self.document, path)?;
        info!("Saved {} shapes to {}", self.document.len(), path.display());
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Replace the document with the one stored at `path`. On error the
    /// current document is left untouched.
    pub fn load(&mut self, path: &Path) -> PersistenceResult<()> {
        let loaded = persistence::load_from_file(path).inspect_err(|e| {
            warn!("Rejected {}: {}", path.display(), e);
        })?;
        info!("Loaded {} shapes from {}", loaded.len(), path.display());
        let grid_visible = self.document.page.grid_visible;
        self.document = loaded;
        self.document.page.grid_visible = grid_visible;
        self.reset_session();
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }
}
