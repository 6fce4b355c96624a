//! # Catalog
//!
//! The product catalog the storefront sells from.
//!
//! The catalog is loaded once and never mutated by the engine. Lookups are
//! linear; the catalog is a handful of entries.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Category, Product};

/// Standard catalog rows: (id, name, brand, price¢, refill¢, category, points).
///
/// A refill price of `None` means the product is not refillable.
const STANDARD_PRODUCTS: &[(&str, &str, &str, i64, Option<i64>, Category, u32)] = &[
    ("1", "Tide Laundry Detergent", "Tide", 2499, Some(1899), Category::Cleaning, 25),
    ("2", "Head & Shoulders Shampoo", "Head & Shoulders", 1999, Some(1499), Category::PersonalCare, 20),
    ("3", "Dove Hand Soap", "Dove", 1299, Some(899), Category::PersonalCare, 15),
    ("4", "Dawn Dish Soap", "Dawn", 1699, Some(1199), Category::Kitchen, 18),
    ("5", "Colgate Toothpaste", "Colgate", 899, Some(699), Category::PersonalCare, 10),
    ("6", "Brita Water Filter", "Brita", 2999, Some(499), Category::Beverages, 30),
    ("7", "Lysol All-Purpose Cleaner", "Lysol", 1599, Some(1099), Category::Cleaning, 16),
    ("8", "Johnson's Baby Shampoo", "Johnson's", 1899, Some(1399), Category::BabyCare, 19),
    ("9", "Mr. Clean Floor Cleaner", "Mr. Clean", 2199, Some(1699), Category::HomeCare, 22),
    ("10", "Febreze Air Freshener", "Febreze", 1399, Some(999), Category::HomeCare, 14),
    ("11", "Nike Memory Foam Pillow", "Nike", 4599, None, Category::HomeCare, 10),
    ("12", "Sherpa Fleece Blanket", "Home Collection", 8999, None, Category::HomeCare, 15),
    ("13", "Stainless Steel Water Bottle", "Hydro Flask", 3499, None, Category::Beverages, 8),
    ("14", "Bamboo Cutting Board Set", "EcoChef", 4999, None, Category::Kitchen, 12),
    ("15", "Organic Cotton Towel Set", "Luxury Living", 7999, None, Category::PersonalCare, 18),
];

/// An immutable, ordered set of products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog from products, rejecting negative prices.
    pub fn new(products: Vec<Product>) -> CoreResult<Self> {
        for product in &products {
            product.validate()?;
        }
        Ok(Catalog { products })
    }

    /// The storefront's standard catalog (10 refillable, 5 non-refillable).
    pub fn standard() -> Self {
        let products = STANDARD_PRODUCTS
            .iter()
            .map(|&(id, name, brand, price, refill, category, points)| Product {
                id: id.to_string(),
                name: name.to_string(),
                brand: Some(brand.to_string()),
                price: Money::from_cents(price),
                refill_price: refill.map(Money::from_cents),
                category,
                reward_points: points,
                has_refill: refill.is_some(),
            })
            .collect();

        Catalog { products }
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Looks a product up by id.
    ///
    /// ## Errors
    /// - `ProductNotFound` for unknown ids
    pub fn get(&self, product_id: &str) -> CoreResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }

    /// Products in `category`, or every product when `category` is `None`.
    pub fn by_category(&self, category: Option<Category>) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .collect()
    }

    /// Number of products per category, in [`Category::ALL`] order.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .into_iter()
            .map(|c| (c, self.products.iter().filter(|p| p.category == c).count()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::standard()
    }
}
