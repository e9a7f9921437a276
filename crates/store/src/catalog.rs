use serde::{Deserialize, Serialize};
use std::path::Path;
use storewalk_common::ProductId;

/// A product as served by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    fn featured(title: &str, price: f64, thumbnail: &str, description: &str) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            price,
            thumbnail: format!("{UNSPLASH}{thumbnail}{UNSPLASH_PARAMS}"),
            description: Some(description.to_string()),
        }
    }
}

const UNSPLASH: &str = "https://images.unsplash.com/photo-";
const UNSPLASH_PARAMS: &str = "?auto=format&fit=crop&w=256&q=80";

/// Store departments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cosmetics,
    Electronics,
    Books,
    Fruits,
    Footwear,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Cosmetics,
        Category::Electronics,
        Category::Books,
        Category::Fruits,
        Category::Footwear,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cosmetics => "Cosmetics",
            Self::Electronics => "Electronics",
            Self::Books => "Books",
            Self::Fruits => "Fruits",
            Self::Footwear => "Footwear",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The flat product list returned by the catalog endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&data)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Products grouped by department, in shelf order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assortment {
    departments: Vec<(Category, Vec<Product>)>,
}

impl Assortment {
    /// The built-in demo assortment stocked on every shelf.
    pub fn featured() -> Self {
        let p = Product::featured;
        Self {
            departments: vec![
                (
                    Category::Cosmetics,
                    vec![
                        p("Lipstick Set", 599.0, "1517841905240-472988babdf9", "Matte finish, 5 vibrant shades, long-lasting."),
                        p("Perfume", 999.0, "1506744038136-46273834b3fb", "Fresh floral scent, 100ml bottle."),
                        p("Face Cream", 399.0, "1515378791036-0648a3ef77b2", "Moisturizing, SPF 15, suitable for all skin types."),
                        p("Makeup Kit", 1799.0, "1515378791036-0648a3ef77b2", "All-in-one, 12 shades, travel pouch."),
                        p("Shampoo", 299.0, "1519125323398-675f0ddb6308", "Anti-dandruff, 400ml, fresh scent."),
                        p("Cosmetic Pouch", 299.0, "1516979187457-637abb4f9353", "Compact, waterproof, zipper closure."),
                    ],
                ),
                (
                    Category::Electronics,
                    vec![
                        p("Bluetooth Headphones", 2499.0, "1517841905240-472988babdf9", "Wireless, noise-cancelling, 20h battery life."),
                        p("Smart Watch", 3499.0, "1516574187841-cb9cc2ca948b", "Fitness tracking, notifications, water-resistant."),
                        p("Tablet", 5999.0, "1517336714731-489689fd1ca8", "10-inch display, 32GB storage, WiFi."),
                        p("Wireless Mouse", 599.0, "1519125323398-675f0ddb6308", "Ergonomic, 2.4GHz, 1600 DPI."),
                        p("Bluetooth Speaker", 1299.0, "1465101046530-73398c7f28ca", "Portable, 10h playtime, waterproof."),
                        p("Gaming Keyboard", 1999.0, "1516979187457-637abb4f9353", "RGB backlight, mechanical keys, anti-ghosting."),
                        p("Wireless Charger", 899.0, "1512820790803-83ca734da794", "Fast charge, universal compatibility."),
                        p("Mobile Phone", 8999.0, "1512436991641-6745cdb1723f", "6.5-inch, dual camera, 64GB storage."),
                    ],
                ),
                (
                    Category::Books,
                    vec![
                        p("The Great Gatsby", 299.0, "1512820790803-83ca734da794", "Classic novel by F. Scott Fitzgerald."),
                        p("Atomic Habits", 499.0, "1516979187457-637abb4f9353", "Self-improvement by James Clear."),
                        p("Harry Potter", 399.0, "1512820790803-83ca734da794", "Fantasy novel by J.K. Rowling."),
                        p("Rich Dad Poor Dad", 350.0, "1517841905240-472988babdf9", "Finance by Robert Kiyosaki."),
                        p("Wings of Fire", 299.0, "1516979187457-637abb4f9353", "Autobiography by A.P.J. Abdul Kalam."),
                        p("The Alchemist", 349.0, "1502741338009-cac2772e18bc", "Novel by Paulo Coelho."),
                    ],
                ),
                (
                    Category::Fruits,
                    vec![
                        p("Apple", 120.0, "1567306226416-28f0efdc88ce", "Fresh red apples, 1kg."),
                        p("Banana", 60.0, "1574226516831-e1dff420e8e7", "Ripe bananas, 1 dozen."),
                        p("Orange", 80.0, "1464306076886-debede6bbf09", "Juicy oranges, 1kg."),
                        p("Grapes", 90.0, "1502741338009-cac2772e18bc", "Seedless grapes, 500g."),
                        p("Strawberry", 150.0, "1465101046530-73398c7f28ca", "Fresh strawberries, 250g."),
                        p("Watermelon", 200.0, "1519864600265-abb23847ef2c", "Sweet watermelon, 1pc."),
                    ],
                ),
                (
                    Category::Footwear,
                    vec![
                        p("Sneakers", 1599.0, "1517841905240-472988babdf9", "Breathable mesh, lightweight, unisex."),
                        p("Men's Shoes", 1799.0, "1517841905240-472988babdf9", "Casual, lace-up, lightweight."),
                        p("Women's Sandals", 899.0, "1506744038136-46273834b3fb", "Comfortable, slip-on, summer style."),
                        p("Sports Shoes", 1299.0, "1516979187457-637abb4f9353", "Running shoes, lightweight."),
                        p("Flip Flops", 299.0, "1512820790803-83ca734da794", "Casual flip flops, waterproof."),
                        p("Formal Shoes", 1999.0, "1516979187457-637abb4f9353", "Leather formal shoes."),
                    ],
                ),
            ],
        }
    }

    /// Group catalog products by department. Titles that match a featured
    /// product take its department, others are classified by keyword;
    /// unclassifiable products are left out.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let featured = Self::featured();
        let mut departments: Vec<(Category, Vec<Product>)> =
            Category::ALL.iter().map(|c| (*c, Vec::new())).collect();

        for product in &catalog.products {
            let category = featured
                .category_of(&product.title)
                .or_else(|| crate::shape::classify(&product.title));
            match category {
                Some(category) => {
                    if let Some((_, list)) = departments.iter_mut().find(|(c, _)| *c == category) {
                        list.push(product.clone());
                    }
                }
                None => tracing::debug!(title = %product.title, "product has no department"),
            }
        }
        Self { departments }
    }

    pub fn products(&self, category: Category) -> &[Product] {
        self.departments
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    /// Department of the product with exactly this title.
    pub fn category_of(&self, title: &str) -> Option<Category> {
        self.departments
            .iter()
            .find(|(_, list)| list.iter().any(|p| p.title == title))
            .map(|(c, _)| *c)
    }

    pub fn len(&self) -> usize {
        self.departments.iter().map(|(_, list)| list.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Display price: catalog price times a fixed conversion, with a currency
/// sign. Whole amounts print without decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceFormat {
    pub currency: String,
    pub multiplier: f64,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            currency: "₹".to_string(),
            multiplier: 85.0,
        }
    }
}

impl PriceFormat {
    pub fn format(&self, price: f64) -> String {
        let amount = price * self.multiplier;
        if amount.fract() == 0.0 {
            format!("{}{amount:.0}", self.currency)
        } else {
            format!("{}{amount:.2}", self.currency)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn featured_has_every_department() {
        let a = Assortment::featured();
        for c in Category::ALL {
            assert!(!a.products(c).is_empty(), "{c} is empty");
        }
        assert_eq!(a.products(Category::Electronics).len(), 8);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn category_lookup_by_exact_title() {
        let a = Assortment::featured();
        assert_eq!(a.category_of("Harry Potter"), Some(Category::Books));
        assert_eq!(a.category_of("Formal Shoes"), Some(Category::Footwear));
        assert_eq!(a.category_of("harry potter"), None);
    }

    #[test]
    fn catalog_parses_endpoint_json() {
        let json = r#"[
            {"id": 3, "title": "Tablet", "price": 59.5, "thumbnail": "t.png"},
            {"id": 4, "title": "Desk Lamp", "price": 12, "thumbnail": "l.png", "description": "LED"}
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products[0].id, Some(ProductId(3)));
        assert_eq!(catalog.products[1].description.as_deref(), Some("LED"));
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        assert!(matches!(
            Catalog::from_json("{\"title\": 1}"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn assortment_from_catalog_groups_by_department() {
        let json = r#"[
            {"id": 1, "title": "Perfume", "price": 10},
            {"id": 2, "title": "Running Shoe", "price": 20},
            {"id": 3, "title": "Desk Lamp", "price": 5}
        ]"#;
        let a = Assortment::from_catalog(&Catalog::from_json(json).unwrap());
        assert_eq!(a.products(Category::Cosmetics).len(), 1);
        assert_eq!(a.products(Category::Footwear).len(), 1);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn price_display() {
        let fmt = PriceFormat::default();
        assert_eq!(fmt.format(599.0), "₹50915");
        assert_eq!(fmt.format(0.5), "₹42.50");
    }
}
