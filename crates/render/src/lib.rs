//! Rendering adapter: renderer-agnostic interface over a planned store.
//!
//! # Invariants
//! - Renderers read the plan and the view; they never change either.
//! - The view is a camera pose, so any controller can feed it.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
