use egui::{Color32, Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::id_generator::ShapeId;
use crate::shape::{Shape, ShapeType};

/// Page the diagram is drawn on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    /// Portrait page size.
    pub size: Vec2,
    pub landscape: bool,
    pub grid_visible: bool,
    pub background: Color32,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            size: Vec2::new(1050.0, 1500.0),
            landscape: false,
            grid_visible: true,
            background: Color32::WHITE,
        }
    }
}

impl PageSettings {
    /// Page size with the orientation applied.
    pub fn effective_size(&self) -> Vec2 {
        if self.landscape {
            Vec2::new(self.size.y, self.size.x)
        } else {
            self.size
        }
    }
}

/// Ordered shape collection; later shapes are drawn on top.
#[derive(Debug, Clone, Default)]
pub struct Document {
    shapes: Vec<ShapeType>,
    pub page: PageSettings,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[ShapeType] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [ShapeType] {
        &mut self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn add_shape(&mut self, shape: ShapeType) {
        self.shapes.push(shape);
    }

    /// Replace all shapes, keeping the page settings.
    pub fn replace_shapes(&mut self, shapes: Vec<ShapeType>) {
        self.shapes = shapes;
    }

    /// Drop every shape, keeping the page settings.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: ShapeId) -> Option<&ShapeType> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut ShapeType> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<ShapeType> {
        let index = self.index_of(id)?;
        Some(self.shapes.remove(index))
    }

    /// Topmost shape whose outline contains `pos`.
    pub fn shape_at(&self, pos: Pos2) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.contains_point(pos))
            .map(|s| s.id())
    }

    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| s.is_selected())
            .map(|s| s.id())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.is_selected()).count()
    }

    pub fn clear_selection(&mut self) {
        for shape in &mut self.shapes {
            shape.set_selected(false);
        }
    }

    pub fn select_all(&mut self) {
        for shape in &mut self.shapes {
            shape.set_selected(true);
        }
    }

    pub fn set_selected(&mut self, id: ShapeId, selected: bool) {
        if let Some(shape) = self.get_mut(id) {
            shape.set_selected(selected);
        }
    }

    pub fn is_topmost(&self, id: ShapeId) -> bool {
        self.shapes.last().is_some_and(|s| s.id() == id)
    }

    pub fn is_bottommost(&self, id: ShapeId) -> bool {
        self.shapes.first().is_some_and(|s| s.id() == id)
    }

    /// Move to the end of the draw order. Returns false when nothing moved.
    pub fn bring_to_front(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.shapes.len() => {
                let shape = self.shapes.remove(index);
                self.shapes.push(shape);
                true
            }
            _ => false,
        }
    }

    pub fn send_to_back(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                let shape = self.shapes.remove(index);
                self.shapes.insert(0, shape);
                true
            }
            _ => false,
        }
    }

    /// Swap with the shape drawn directly above.
    pub fn bring_forward(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.shapes.len() => {
                self.shapes.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    pub fn send_backward(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                self.shapes.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }
}
