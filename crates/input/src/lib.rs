//! Input Surface: pointer lock, raw mouse deltas, and keyboard movement intent.
//!
//! # Invariants
//! - Events are delivered in the order the platform queued them.
//! - Lock requests are fire-and-forget; only the platform resolves them.
//! - Movement intent is an explicit value, never global state.

pub mod intent;
pub mod surface;

pub use intent::{MoveIntent, MoveKey};
pub use surface::{
    Channel, Document, ElementId, InputSurface, ListenerId, PointerMove, SurfaceEvent,
};
