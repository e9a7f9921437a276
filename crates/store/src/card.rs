use crate::catalog::{PriceFormat, Product};
use storewalk_common::ProductId;

pub const NO_DESCRIPTION: &str = "No description available.";
pub const PRODUCTS_PAGE: &str = "/products";

/// What the product detail card shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub product_id: Option<ProductId>,
    pub title: String,
    pub description: String,
    pub price_label: String,
    pub price: f64,
    pub image: String,
}

impl ProductCard {
    pub fn from_product(product: &Product, prices: &PriceFormat) -> Self {
        let description = match product.description.as_deref() {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => NO_DESCRIPTION.to_string(),
        };
        Self {
            product_id: product.id,
            title: product.title.clone(),
            description,
            price_label: prices.format(product.price),
            price: product.price,
            image: product.thumbnail.clone(),
        }
    }
}

/// Buttons on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    AddToCart,
    AddToWishlist,
    Close,
    ReturnToProducts,
}

impl CardAction {
    pub const ALL: [CardAction; 4] = [
        CardAction::AddToCart,
        CardAction::AddToWishlist,
        CardAction::Close,
        CardAction::ReturnToProducts,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CardAction::AddToCart => "Add to Cart",
            CardAction::AddToWishlist => "Add to Wishlist",
            CardAction::Close => "Close",
            CardAction::ReturnToProducts => "Return to Products",
        }
    }

    /// Page the action navigates to, if it leaves the store.
    pub fn navigates_to(&self) -> Option<&'static str> {
        match self {
            CardAction::ReturnToProducts => Some(PRODUCTS_PAGE),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f, "{}", self.price_label)?;
        if !self.image.is_empty() {
            writeln!(f, "image: {}", self.image)?;
        }
        let actions: Vec<_> = CardAction::ALL.iter().map(CardAction::label).collect();
        write!(f, "[{}]", actions.join("] ["))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Assortment, Category};

    #[test]
    fn card_from_featured_product() {
        let a = Assortment::featured();
        let tablet = a
            .products(Category::Electronics)
            .iter()
            .find(|p| p.title == "Tablet")
            .unwrap();
        let card = ProductCard::from_product(tablet, &PriceFormat::default());
        assert_eq!(card.description, "10-inch display, 32GB storage, WiFi.");
        assert_eq!(card.price_label, "₹509915");
        assert!(card.image.contains("unsplash"));
    }

    #[test]
    fn missing_or_blank_description_falls_back() {
        let mut p = Product {
            id: Some(ProductId(7)),
            title: "Mystery".into(),
            price: 10.5,
            thumbnail: String::new(),
            description: None,
        };
        let prices = PriceFormat::default();
        assert_eq!(ProductCard::from_product(&p, &prices).description, NO_DESCRIPTION);
        p.description = Some(String::new());
        let card = ProductCard::from_product(&p, &prices);
        assert_eq!(card.description, NO_DESCRIPTION);
        assert_eq!(card.price_label, "₹892.50");
        assert_eq!(card.product_id, Some(ProductId(7)));
    }

    #[test]
    fn only_return_navigates() {
        for action in CardAction::ALL {
            let expected = (action == CardAction::ReturnToProducts).then_some("/products");
            assert_eq!(action.navigates_to(), expected);
        }
    }

    #[test]
    fn display_lists_actions() {
        let p = Product {
            id: None,
            title: "Apple".into(),
            price: 120.0,
            thumbnail: String::new(),
            description: Some("Fresh red apples, 1kg.".into()),
        };
        let text = ProductCard::from_product(&p, &PriceFormat::default()).to_string();
        assert!(text.starts_with("Apple\nFresh red apples, 1kg.\n₹10200\n"));
        assert!(text.ends_with("[Add to Cart] [Add to Wishlist] [Close] [Return to Products]"));
        assert!(!text.contains("image:"));
    }
}
