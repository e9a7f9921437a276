//! First-person look controls: pointer-lock mouse look, camera-relative
//! movement, and damped locomotion.
//!
//! # Invariants
//! - Orientation is composed yaw-then-pitch with roll held at 0.
//! - Pitch stays inside the range derived from the polar-angle limits.
//! - Pointer motion only rotates the camera while the pointer is locked.
//! - The camera is bound, never created or destroyed, by the controls.

mod events;
mod locomotion;
mod object;
mod orientation;
mod pointer_lock;

pub use events::{ControlEvent, Notifier, SubscriptionId};
pub use locomotion::{Locomotion, LocomotionConfig};
pub use object::{ControlledObject, PerspectiveCamera, ndc_from_screen};
pub use orientation::Orientation;
pub use pointer_lock::{
    ControlsState, LockState, LookConfig, POINTER_RADIANS_PER_PIXEL, PointerLockControls,
};
