//! wgpu render backend for the store walkthrough.
//!
//! Every piece of the store, from the floor to each product part, is drawn
//! as a lit box instance. Curved primitives use their bounding box.
//!
//! # Invariants
//! - The renderer never mutates the plan.
//! - Instances are rebuilt only when the plan or the highlight changes.

mod gpu;
mod scene;
mod shaders;

pub use gpu::WgpuRenderer;
pub use scene::{BoxInstance, store_instances};
