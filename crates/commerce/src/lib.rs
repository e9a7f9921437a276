//! Cart and wishlist contracts for the store walkthrough.
//!
//! Requests mirror the JSON bodies the storefront posts to its cart and
//! wishlist endpoints. No transport lives here: a [`CommerceService`] takes
//! the request, and [`InMemoryCommerce`] is the recorder used by the apps
//! and tests.

mod request;
mod service;

pub use request::{CART_ADD_PATH, CartAddRequest, WISHLIST_ADD_PATH, WishlistAddRequest};
pub use service::{
    CommerceError, CommerceReceipt, CommerceService, InMemoryCommerce, ListKind, perform,
};
