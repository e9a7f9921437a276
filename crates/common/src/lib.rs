//! Shared types for the storewalk virtual store.

mod types;

pub use types::{Color, ProductId, Transform};
