use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Process-unique identity of a shape.
///
/// Cloning a shape copies its id, so undo snapshots and the live collection
/// agree on which shape is which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(Uuid);

impl ShapeId {
    /// Parse an id previously produced by `to_string`.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

pub fn generate_id() -> ShapeId {
    ShapeId(Uuid::new_v4())
}
