//! Store content: the product catalog, how products are shaped, where they
//! sit on the shelves, and the card shown when one is picked.
//!
//! # Invariants
//! - Planning is deterministic for a given config and assortment.
//! - Only stocked slots are pickable.
//! - Every slot has a label, either a price tag or the empty-slot text.

pub mod card;
pub mod catalog;
pub mod config;
pub mod layout;
pub mod pick;
pub mod shape;
pub mod walk;

pub use card::{CardAction, ProductCard};
pub use catalog::{Assortment, Catalog, CatalogError, Category, PriceFormat, Product};
pub use config::{ConfigError, LabelConfig, RoomConfig, ShelvingConfig, StoreConfig};
pub use layout::{Label, LabelText, PointLight, ProductSlot, Room, Shelf, Sign, StorePlan};
pub use pick::ray_box;
pub use shape::{Finish, Part, Primitive, ProductShape, SHAPE_TABLE, shape_for};
pub use walk::{INSTRUCTIONS, STORE_ELEMENT, Walkthrough};
