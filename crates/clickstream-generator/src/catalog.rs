//! The standard e-commerce catalog.
//!
//! [`EntityPools`] bundles every weighted pool and vocabulary the factory,
//! simulator and walker draw from. It is built once per run and shared
//! read-only across shards.

use crate::pools::{PoolError, WeightedPool};
use clickstream_core::{Browser, Category, DeviceType};
use rust_decimal::Decimal;

/// Price range, in cents, for products of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min_cents: i64,
    pub max_cents: i64,
}

impl PriceRange {
    const fn dollars(min: i64, max: i64) -> Self {
        Self {
            min_cents: min * 100,
            max_cents: max * 100,
        }
    }

    pub fn min(&self) -> Decimal {
        Decimal::new(self.min_cents, 2)
    }

    pub fn max(&self) -> Decimal {
        Decimal::new(self.max_cents, 2)
    }

    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min() && price <= self.max()
    }
}

/// Category-specific price range.
pub fn price_range(category: Category) -> PriceRange {
    match category {
        Category::Electronics => PriceRange::dollars(50, 2000),
        Category::Clothing | Category::Sports => PriceRange::dollars(15, 200),
        Category::Home => PriceRange::dollars(20, 500),
        Category::Beauty => PriceRange::dollars(5, 100),
        Category::Toys => PriceRange::dollars(10, 150),
        Category::Books => PriceRange::dollars(8, 50),
        Category::Food => PriceRange::dollars(3, 30),
    }
}

/// Nouns products of a category are named with.
pub fn category_nouns(category: Category) -> &'static [&'static str] {
    match category {
        Category::Electronics => &[
            "Smartphone", "Laptop", "Tablet", "TV", "Headphones", "Speaker", "Camera",
            "Smartwatch", "Monitor", "Keyboard",
        ],
        Category::Clothing => &[
            "T-shirt", "Jeans", "Dress", "Jacket", "Sweater", "Shorts", "Socks", "Hat", "Gloves",
            "Shoes",
        ],
        Category::Home => &[
            "Sofa", "Chair", "Table", "Lamp", "Rug", "Curtains", "Bed", "Pillow", "Vase", "Mirror",
        ],
        Category::Beauty => &[
            "Lipstick", "Mascara", "Moisturizer", "Shampoo", "Perfume", "Soap", "Lotion",
            "Face Mask", "Nail Polish", "Eyeshadow",
        ],
        Category::Sports => &[
            "Running Shoes", "Yoga Mat", "Weights", "Bicycle", "Tennis Racket", "Basketball",
            "Football", "Swimsuit", "Helmet", "Backpack",
        ],
        Category::Toys => &[
            "Action Figure", "Doll", "Board Game", "Puzzle", "LEGO Set", "Stuffed Animal",
            "Remote Control Car", "Building Blocks", "Card Game", "Robot",
        ],
        Category::Books => &[
            "Novel", "Cookbook", "Biography", "Self-help Book", "History Book", "Children's Book",
            "Comic Book", "Art Book", "Travel Guide", "Dictionary",
        ],
        Category::Food => &[
            "Chocolate", "Coffee", "Tea", "Snacks", "Pasta", "Rice", "Cereal", "Chips", "Cookies",
            "Nuts",
        ],
    }
}

pub const PRODUCT_ADJECTIVES: &[&str] = &[
    "Premium", "Deluxe", "Basic", "Advanced", "Professional", "Compact", "Ultra", "Mini", "Maxi",
    "Essential",
];

/// Phrase bank for product descriptions. `{category}` is replaced with the
/// product's category name.
pub const DESCRIPTION_PHRASES: &[&str] = &[
    "High-quality {category} product",
    "Perfect for everyday use",
    "Designed with premium materials",
    "Modern and stylish design",
    "Durable and long-lasting",
    "Great value for money",
    "Customer favorite",
    "Versatile and practical",
    "Innovative features",
    "Easy to use and maintain",
];

pub const SEARCH_QUERIES: &[&str] = &[
    "shirt", "dress", "shoes", "laptop", "phone", "tv", "sofa", "camera", "watch", "headphones",
    "jeans", "sneakers", "jacket", "sweater", "socks", "hat", "gloves", "scarf", "sunglasses",
    "tablet", "monitor", "keyboard", "mouse", "printer", "speaker", "coffee maker", "blender",
    "makeup", "skincare", "perfume", "shampoo", "soap", "toothpaste", "deodorant",
    "basketball", "football", "tennis", "yoga mat", "weights", "running shoes", "bicycle",
    "action figure", "board game", "puzzle", "doll", "lego", "card game", "video game",
    "novel", "cookbook", "biography", "self-help", "history book", "children's book",
    "chocolate", "coffee", "tea", "snacks", "pasta", "rice", "cereal", "chips",
];

/// Every pool a run draws from.
#[derive(Debug, Clone)]
pub struct EntityPools {
    pub device_types: WeightedPool<DeviceType>,
    pub browsers: WeightedPool<Browser>,
    pub countries: WeightedPool<&'static str>,
    pub referrers: WeightedPool<&'static str>,
    pub categories: WeightedPool<Category>,
    pub search_queries: WeightedPool<&'static str>,
    pub adjectives: WeightedPool<&'static str>,
}

impl EntityPools {
    /// The standard shopper catalog.
    pub fn standard() -> Result<Self, PoolError> {
        Ok(Self {
            device_types: WeightedPool::new(
                "device_types",
                vec![
                    (DeviceType::Desktop, 0.5),
                    (DeviceType::Mobile, 0.4),
                    (DeviceType::Tablet, 0.1),
                ],
            )?,
            browsers: WeightedPool::new(
                "browsers",
                vec![
                    (Browser::Chrome, 0.6),
                    (Browser::Safari, 0.25),
                    (Browser::Firefox, 0.1),
                    (Browser::Edge, 0.05),
                ],
            )?,
            countries: WeightedPool::new(
                "countries",
                vec![
                    ("US", 0.3),
                    ("UK", 0.15),
                    ("Canada", 0.1),
                    ("Australia", 0.1),
                    ("Germany", 0.1),
                    ("France", 0.1),
                    ("India", 0.1),
                    ("Brazil", 0.05),
                ],
            )?,
            referrers: WeightedPool::new(
                "referrers",
                vec![
                    ("direct", 0.25),
                    ("google", 0.3),
                    ("facebook", 0.15),
                    ("instagram", 0.1),
                    ("email", 0.1),
                    ("bing", 0.05),
                    ("twitter", 0.03),
                    ("affiliate", 0.02),
                ],
            )?,
            categories: WeightedPool::uniform("categories", Category::ALL.to_vec())?,
            search_queries: WeightedPool::uniform("search_queries", SEARCH_QUERIES.to_vec())?,
            adjectives: WeightedPool::uniform("adjectives", PRODUCT_ADJECTIVES.to_vec())?,
        })
    }
}
