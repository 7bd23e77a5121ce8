#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod binding;
pub mod canvas;
pub mod command;
pub mod config;
pub mod document;
pub mod id_generator;
pub mod input;
pub mod panels;
pub mod persistence;
pub mod renderer;
pub mod shape;
pub mod tools;

pub use app::DiagramApp;
pub use canvas::CanvasController;
pub use command::{Command, SnapshotHistory};
pub use config::CanvasConfig;
pub use document::{Document, PageSettings};
pub use id_generator::ShapeId;
pub use input::{InputEvent, InputHandler};
pub use persistence::PersistenceError;
pub use renderer::Renderer;
pub use shape::{Shape, ShapeKind, ShapeType};
