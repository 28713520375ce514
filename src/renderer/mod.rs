//! Rendering module
//!
//! The simulation snapshot is turned into a flat list of draw commands;
//! on the web they are replayed onto a 2D canvas context.

pub mod commands;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use commands::{Color, DrawCommand, TextAlign};
pub use scene::build;
