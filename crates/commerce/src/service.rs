use crate::request::{CartAddRequest, WishlistAddRequest};
use std::collections::BTreeSet;
use storewalk_common::ProductId;
use storewalk_store::{CardAction, ProductCard};

#[derive(Debug, thiserror::Error)]
pub enum CommerceError {
    #[error("request has no title")]
    MissingTitle,
    #[error("request has no image")]
    MissingImage,
    #[error("invalid price: {0}")]
    InvalidPrice(f64),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Cart,
    Wishlist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommerceReceipt {
    Added,
    AlreadyPresent,
}

impl CommerceReceipt {
    /// Confirmation shown to the shopper.
    pub fn message(&self, list: ListKind) -> &'static str {
        match (self, list) {
            (CommerceReceipt::Added, ListKind::Cart) => "Added to cart!",
            (CommerceReceipt::Added, ListKind::Wishlist) => "Added to wishlist!",
            (CommerceReceipt::AlreadyPresent, ListKind::Cart) => "Already in cart.",
            (CommerceReceipt::AlreadyPresent, ListKind::Wishlist) => "Already in wishlist.",
        }
    }
}

/// Where cart and wishlist adds go.
pub trait CommerceService {
    fn add_to_cart(&mut self, request: &CartAddRequest) -> Result<CommerceReceipt, CommerceError>;

    fn add_to_wishlist(
        &mut self,
        request: &WishlistAddRequest,
    ) -> Result<CommerceReceipt, CommerceError>;
}

/// Run a card action against `service`. Actions that don't touch a list
/// return `Ok(None)`.
pub fn perform(
    service: &mut impl CommerceService,
    action: CardAction,
    card: &ProductCard,
) -> Result<Option<(ListKind, CommerceReceipt)>, CommerceError> {
    let outcome = match action {
        CardAction::AddToCart => {
            let receipt = service.add_to_cart(&CartAddRequest::from_card(card))?;
            Some((ListKind::Cart, receipt))
        }
        CardAction::AddToWishlist => {
            let receipt = service.add_to_wishlist(&WishlistAddRequest::from_card(card))?;
            Some((ListKind::Wishlist, receipt))
        }
        CardAction::Close | CardAction::ReturnToProducts => None,
    };
    if let Some((list, receipt)) = outcome {
        tracing::info!(title = %card.title, ?list, ?receipt, "commerce action");
    }
    Ok(outcome)
}

/// Products are keyed by id when they have one, otherwise by title.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ItemKey {
    Id(ProductId),
    Title(String),
}

impl ItemKey {
    fn new(id: Option<ProductId>, title: &str) -> Self {
        match id {
            Some(id) => ItemKey::Id(id),
            None => ItemKey::Title(title.to_string()),
        }
    }
}

/// Records adds in memory; repeat adds report [`CommerceReceipt::AlreadyPresent`].
#[derive(Debug, Default)]
pub struct InMemoryCommerce {
    cart: BTreeSet<ItemKey>,
    wishlist: BTreeSet<ItemKey>,
    cart_log: Vec<CartAddRequest>,
    wishlist_log: Vec<WishlistAddRequest>,
}

impl InMemoryCommerce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cart(&self) -> &[CartAddRequest] {
        &self.cart_log
    }

    pub fn wishlist(&self) -> &[WishlistAddRequest] {
        &self.wishlist_log
    }

    fn record(set: &mut BTreeSet<ItemKey>, key: ItemKey) -> CommerceReceipt {
        if set.insert(key) {
            CommerceReceipt::Added
        } else {
            CommerceReceipt::AlreadyPresent
        }
    }
}

fn validate(title: &str, price: f64, image: &str) -> Result<(), CommerceError> {
    if title.trim().is_empty() {
        return Err(CommerceError::MissingTitle);
    }
    if image.trim().is_empty() {
        return Err(CommerceError::MissingImage);
    }
    if !price.is_finite() || price < 0.0 {
        return Err(CommerceError::InvalidPrice(price));
    }
    Ok(())
}

impl CommerceService for InMemoryCommerce {
    fn add_to_cart(&mut self, request: &CartAddRequest) -> Result<CommerceReceipt, CommerceError> {
        validate(&request.title, request.price, &request.image)?;
        let receipt = Self::record(&mut self.cart, ItemKey::new(request.product_id, &request.title));
        if receipt == CommerceReceipt::Added {
            self.cart_log.push(request.clone());
        }
        Ok(receipt)
    }

    fn add_to_wishlist(
        &mut self,
        request: &WishlistAddRequest,
    ) -> Result<CommerceReceipt, CommerceError> {
        validate(&request.title, request.price, &request.image_url)?;
        let receipt = Self::record(
            &mut self.wishlist,
            ItemKey::new(request.product_id, &request.title),
        );
        if receipt == CommerceReceipt::Added {
            self.wishlist_log.push(request.clone());
        }
        Ok(receipt)
    }
}
