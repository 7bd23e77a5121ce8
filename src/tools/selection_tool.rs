use egui::{Modifiers, PointerButton, Pos2, Vec2};
use log::{debug, info};

use super::{Tool, ToolContext};
use crate::binding::{self, Endpoint};
use crate::id_generator::ShapeId;
use crate::shape::Shape;

/// Gesture in progress on the canvas
#[derive(Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    /// Translating the selection; `shape` is the one under the press.
    Dragging { shape: ShapeId },
    Resizing { shape: ShapeId, handle: usize },
    DraggingLineEndpoint { line: ShapeId, endpoint: Endpoint },
    Rotating {
        shape: ShapeId,
        pivot: Pos2,
        start_angle: f32,
        initial_rotation: f32,
    },
    EditingText { shape: ShapeId },
}

// Manual Debug implementation so logs stay on one line
impl std::fmt::Debug for InteractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Dragging { .. } => write!(f, "Dragging"),
            Self::Resizing { handle, .. } => write!(f, "Resizing(handle {handle})"),
            Self::DraggingLineEndpoint { endpoint, .. } => {
                write!(f, "DraggingLineEndpoint({endpoint:?})")
            }
            Self::Rotating { initial_rotation, .. } => {
                write!(f, "Rotating(from {initial_rotation})")
            }
            Self::EditingText { .. } => write!(f, "EditingText"),
        }
    }
}

/// Select, move, resize, rotate and connect shapes with the pointer.
#[derive(Debug, Clone)]
pub struct SelectionTool {
    state: InteractionState,
    press_pos: Pos2,
    last_pos: Pos2,
    /// True until the pointer travels past the drag threshold.
    is_click: bool,
    /// Pressed an already selected member of a multi-selection: collapse to
    /// it on release unless the press turns into a drag.
    collapse_on_release: bool,
    hovered: Option<ShapeId>,
    snap_indicator: Option<Pos2>,
}

impl Default for SelectionTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTool {
    pub fn new() -> Self {
        Self {
            state: InteractionState::Idle,
            press_pos: Pos2::ZERO,
            last_pos: Pos2::ZERO,
            is_click: false,
            collapse_on_release: false,
            hovered: None,
            snap_indicator: None,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Topmost unselected shape under the pointer.
    pub fn hovered(&self) -> Option<ShapeId> {
        self.hovered
    }

    /// Magnetic point the dragged endpoint is currently snapped to.
    pub fn snap_indicator(&self) -> Option<Pos2> {
        self.snap_indicator
    }

    pub fn editing_text(&self) -> Option<ShapeId> {
        match self.state {
            InteractionState::EditingText { shape } => Some(shape),
            _ => None,
        }
    }

    /// Drop any gesture in progress, including text editing.
    pub fn reset(&mut self) {
        self.set_state(InteractionState::Idle);
        self.is_click = false;
        self.collapse_on_release = false;
        self.snap_indicator = None;
        self.hovered = None;
    }

    fn set_state(&mut self, state: InteractionState) {
        if self.state != state {
            debug!("Selection state: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Enter text editing on the topmost shape under `pos`.
    pub fn on_double_click(&mut self, ctx: &mut ToolContext<'_>, pos: Pos2) -> Option<ShapeId> {
        let id = ctx.document.shape_at(pos)?;
        ctx.select_only(id);
        self.set_state(InteractionState::EditingText { shape: id });
        Some(id)
    }

    pub fn finish_text_edit(&mut self) {
        if matches!(self.state, InteractionState::EditingText { .. }) {
            self.set_state(InteractionState::Idle);
        }
    }

    fn press_primary(&mut self, ctx: &mut ToolContext<'_>, pos: Pos2, modifiers: Modifiers) {
        if let Some(state) = self.grab_rotation_button(ctx, pos) {
            self.set_state(state);
            return;
        }
        if let Some(state) = self.grab_handle(ctx, pos) {
            self.set_state(state);
            return;
        }

        let Some(id) = ctx.document.shape_at(pos) else {
            ctx.clear_selection();
            return;
        };

        let already_selected = ctx.document.get(id).is_some_and(|s| s.is_selected());
        if modifiers.ctrl || modifiers.command || modifiers.shift {
            ctx.document.set_selected(id, !already_selected);
            if already_selected {
                if *ctx.primary == Some(id) {
                    *ctx.primary = ctx.document.selected_ids().last().copied();
                }
            } else {
                *ctx.primary = Some(id);
            }
        } else if already_selected && ctx.document.selected_count() > 1 {
            self.collapse_on_release = true;
            *ctx.primary = Some(id);
        } else {
            ctx.select_only(id);
        }

        self.hovered = None;
        self.set_state(InteractionState::Dragging { shape: id });
    }

    fn grab_rotation_button(&self, ctx: &ToolContext<'_>, pos: Pos2) -> Option<InteractionState> {
        let shape = ctx.primary.and_then(|id| ctx.document.get(id))?;
        if !shape.is_selected() || !shape.can_rotate() || !shape.rotation_button_rect().contains(pos) {
            return None;
        }
        let pivot = shape.as_polygon()?.rect().center();
        Some(InteractionState::Rotating {
            shape: shape.id(),
            pivot,
            start_angle: pointer_angle(pivot, pos),
            initial_rotation: shape.rotation(),
        })
    }

    fn grab_handle(&self, ctx: &mut ToolContext<'_>, pos: Pos2) -> Option<InteractionState> {
        let (id, handle, is_line) = ctx
            .document
            .shapes()
            .iter()
            .rev()
            .filter(|s| s.is_selected())
            .find_map(|s| s.hit_handle(pos).map(|h| (s.id(), h, s.kind().is_line())))?;

        *ctx.primary = Some(id);
        let state = match (is_line, handle) {
            (true, 0) => InteractionState::DraggingLineEndpoint {
                line: id,
                endpoint: Endpoint::Start,
            },
            (true, 2) => InteractionState::DraggingLineEndpoint {
                line: id,
                endpoint: Endpoint::End,
            },
            _ => InteractionState::Resizing { shape: id, handle },
        };
        Some(state)
    }

    fn drag_endpoint(&mut self, ctx: &mut ToolContext<'_>, line: ShapeId, endpoint: Endpoint, pos: Pos2) {
        let snap = binding::snap_target(ctx.document.shapes(), line, pos, ctx.config.magnetic_range);
        let Some(shape) = ctx.document.get_mut(line).and_then(|s| s.as_line_mut()) else {
            return;
        };

        match snap {
            Some(target) => {
                if shape.binding(endpoint) != Some(target.binding) {
                    debug!(
                        "Bound {:?} of {} to point {} of {}",
                        endpoint, line, target.binding.magnetic_index, target.binding.target
                    );
                }
                shape.set_endpoint(endpoint, target.point);
                shape.set_binding(endpoint, Some(target.binding));
                self.snap_indicator = Some(target.point);
            }
            None => {
                shape.set_endpoint(endpoint, pos);
                shape.set_binding(endpoint, None);
                self.snap_indicator = None;
            }
        }
    }

    fn translate_selection(&self, ctx: &mut ToolContext<'_>, pressed: ShapeId, delta: Vec2) -> bool {
        if !ctx.document.get(pressed).is_some_and(|s| s.is_selected()) {
            return false;
        }
        let moved = ctx.document.selected_ids();
        for shape in ctx.document.shapes_mut() {
            if shape.is_selected() {
                shape.move_by(delta);
            }
        }
        binding::detach_from_unmoved(ctx.document.shapes_mut(), &moved);
        true
    }

    fn update_hover(&mut self, ctx: &ToolContext<'_>, pos: Pos2) {
        self.hovered = ctx
            .document
            .shapes()
            .iter()
            .rev()
            .find(|s| !s.is_selected() && s.bounding_rect().contains(pos))
            .map(|s| s.id());
    }
}

fn pointer_angle(pivot: Pos2, pos: Pos2) -> f32 {
    let v = pos - pivot;
    v.y.atan2(v.x).to_degrees()
}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "Selection"
    }

    fn on_pointer_down(
        &mut self,
        ctx: &mut ToolContext<'_>,
        pos: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
    ) {
        self.reset();
        self.press_pos = pos;
        self.last_pos = pos;
        self.is_click = true;

        match button {
            PointerButton::Primary => self.press_primary(ctx, pos, modifiers),
            PointerButton::Secondary => match ctx.document.shape_at(pos) {
                Some(id) => ctx.select_only(id),
                None => ctx.clear_selection(),
            },
            _ => {}
        }
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, pos: Pos2) -> bool {
        let delta = pos - self.last_pos;
        let travelled = pos - self.press_pos;
        if travelled.x.abs() + travelled.y.abs() > ctx.config.drag_threshold {
            self.is_click = false;
        }
        if !matches!(self.state, InteractionState::EditingText { .. }) {
            self.update_hover(ctx, pos);
        }

        let state = self.state;
        let changed = match state {
            InteractionState::Idle | InteractionState::EditingText { .. } => false,
            InteractionState::DraggingLineEndpoint { line, endpoint } => {
                self.drag_endpoint(ctx, line, endpoint, pos);
                true
            }
            InteractionState::Resizing { shape, handle } => {
                let Some(target) = ctx.document.get_mut(shape) else {
                    return false;
                };
                target.resize_by(delta, handle);
                if target.kind().is_line() && handle == 1 {
                    binding::detach_from_unmoved(ctx.document.shapes_mut(), &[shape]);
                }
                true
            }
            InteractionState::Rotating {
                shape,
                pivot,
                start_angle,
                initial_rotation,
            } => match ctx.document.get_mut(shape) {
                Some(target) => {
                    target.rotate(initial_rotation + pointer_angle(pivot, pos) - start_angle);
                    true
                }
                None => false,
            },
            InteractionState::Dragging { shape } => self.translate_selection(ctx, shape, delta),
        };

        if changed {
            binding::update_all_line_bindings(ctx.document.shapes_mut());
        }
        self.last_pos = pos;
        changed
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, _pos: Pos2, button: PointerButton) {
        if button != PointerButton::Primary {
            return;
        }
        if let InteractionState::EditingText { .. } = self.state {
            return;
        }

        if self.is_click && self.collapse_on_release {
            if let Some(id) = *ctx.primary {
                info!("Collapsed selection to {}", id);
                ctx.select_only(id);
            }
        }

        self.snap_indicator = None;
        self.collapse_on_release = false;
        self.is_click = false;
        self.set_state(InteractionState::Idle);
    }
}
