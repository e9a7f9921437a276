use crate::service::CommerceError;
use serde::{Deserialize, Serialize};
use storewalk_common::ProductId;
use storewalk_store::ProductCard;

pub const CART_ADD_PATH: &str = "/cart/add";
pub const WISHLIST_ADD_PATH: &str = "/wishlist/add";

/// Body of a cart add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartAddRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub title: String,
    pub price: f64,
    pub image: String,
}

/// Body of a wishlist add. Same fields as the cart, but the image is sent
/// as `image_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistAddRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub title: String,
    pub price: f64,
    pub image_url: String,
}

impl CartAddRequest {
    pub fn from_card(card: &ProductCard) -> Self {
        Self {
            product_id: card.product_id,
            title: card.title.clone(),
            price: card.price,
            image: card.image.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, CommerceError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl WishlistAddRequest {
    pub fn from_card(card: &ProductCard) -> Self {
        Self {
            product_id: card.product_id,
            title: card.title.clone(),
            price: card.price,
            image_url: card.image.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, CommerceError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storewalk_store::{PriceFormat, Product};

    fn card(id: Option<u64>) -> ProductCard {
        let product = Product {
            id: id.map(ProductId),
            title: "Perfume".into(),
            price: 999.0,
            thumbnail: "https://img/p.jpg".into(),
            description: None,
        };
        ProductCard::from_product(&product, &PriceFormat::default())
    }

    #[test]
    fn cart_body_field_names() {
        let json = CartAddRequest::from_card(&card(Some(4))).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["product_id"], 4);
        assert_eq!(value["title"], "Perfume");
        assert_eq!(value["price"], 999.0);
        assert_eq!(value["image"], "https://img/p.jpg");
        assert!(value.get("image_url").is_none());
    }

    #[test]
    fn wishlist_body_uses_image_url() {
        let json = WishlistAddRequest::from_card(&card(Some(4))).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["image_url"], "https://img/p.jpg");
        assert!(value.get("image").is_none());
    }

    #[test]
    fn missing_id_is_omitted() {
        let json = CartAddRequest::from_card(&card(None)).to_json().unwrap();
        assert!(!json.contains("product_id"));
        let back: CartAddRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.product_id, None);
    }

    #[test]
    fn price_is_catalog_price_not_display_price() {
        let req = CartAddRequest::from_card(&card(None));
        assert_eq!(req.price, 999.0);
    }
}
