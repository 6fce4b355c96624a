//! # Product Commands
//!
//! Catalog browsing. The catalog is fixed and held in memory, so these
//! commands never touch the store.

use refillhub_core::{Catalog, Category, Product};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;

/// Category id that selects every product.
pub const ALL_CATEGORIES: &str = "all";

/// Category entry for the browse sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub product_count: usize,
}

/// Lists products, optionally narrowed to one category.
///
/// ## Arguments
/// * `category` - Category id such as `personal-care`; `None` or `"all"`
///   lists everything
///
/// ## Errors
/// `VALIDATION_ERROR` for an unknown category id
pub fn list_products(catalog: &Catalog, category: Option<&str>) -> Result<Vec<Product>, ApiError> {
    debug!(category = ?category, "list_products command");

    let filter = match category {
        None | Some(ALL_CATEGORIES) => None,
        Some(id) => Some(
            Category::from_id(id)
                .ok_or_else(|| ApiError::validation(format!("Unknown category: {}", id)))?,
        ),
    };

    Ok(catalog.by_category(filter).into_iter().cloned().collect())
}

/// Gets a single product.
pub fn get_product(catalog: &Catalog, product_id: &str) -> Result<Product, ApiError> {
    debug!(product_id = %product_id, "get_product command");
    Ok(catalog.get(product_id)?.clone())
}

/// Lists categories with product counts, led by the "all" entry.
pub fn list_categories(catalog: &Catalog) -> Vec<CategorySummary> {
    debug!("list_categories command");

    let all = CategorySummary {
        id: ALL_CATEGORIES.to_string(),
        name: "All Products".to_string(),
        product_count: catalog.len(),
    };

    std::iter::once(all)
        .chain(
            catalog
                .category_counts()
                .into_iter()
                .map(|(category, count)| CategorySummary {
                    id: category.id().to_string(),
                    name: category.display_name().to_string(),
                    product_count: count,
                }),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_list_all_products() {
        let catalog = Catalog::standard();
        assert_eq!(list_products(&catalog, None).unwrap().len(), 15);
        assert_eq!(list_products(&catalog, Some("all")).unwrap().len(), 15);
    }

    #[test]
    fn test_list_products_by_category() {
        let catalog = Catalog::standard();
        let products = list_products(&catalog, Some("personal-care")).unwrap();

        assert!(!products.is_empty());
        assert!(products.iter().all(|p| p.category == Category::PersonalCare));
    }

    #[test]
    fn test_unknown_category() {
        let catalog = Catalog::standard();
        let err = list_products(&catalog, Some("garden")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_get_product_not_found() {
        let catalog = Catalog::standard();
        assert_eq!(get_product(&catalog, "1").unwrap().id, "1");
        assert_eq!(
            get_product(&catalog, "999").unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[test]
    fn test_categories_sum_to_catalog() {
        let catalog = Catalog::standard();
        let categories = list_categories(&catalog);

        assert_eq!(categories[0].id, "all");
        assert_eq!(categories[0].product_count, 15);
        let sum: usize = categories[1..].iter().map(|c| c.product_count).sum();
        assert_eq!(sum, 15);
    }
}
