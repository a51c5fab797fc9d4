//! Product domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shortcakes_core::{IngredientId, ProductCategory, ProductId};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name (unique).
    pub name: String,
    /// URL slug (unique, derived from the name).
    pub slug: String,
    /// Long description.
    pub description: String,
    /// Shop category.
    pub category: ProductCategory,
    /// Unit price.
    pub price: Decimal,
    /// Optional image path (relative to the upload root).
    pub image_path: Option<String>,
    /// Inactive products are hidden from the public catalog.
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One line of a product recipe: an ingredient and the quantity consumed
/// per unit ordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLine {
    /// Ingredient consumed.
    pub ingredient_id: IngredientId,
    /// Ingredient name (joined in for display).
    pub ingredient_name: String,
    /// Quantity consumed per ordered unit, in the ingredient's unit.
    pub quantity: Decimal,
}

/// A product together with its recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWithRecipe {
    /// The product itself.
    #[serde(flatten)]
    pub product: Product,
    /// Recipe lines.
    pub recipe: Vec<RecipeLine>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub price: Decimal,
    /// Recipe lines; may be empty for products without ingredient tracking.
    #[serde(default)]
    pub recipe: Vec<RecipeLineInput>,
}

/// Input for one recipe line.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeLineInput {
    pub ingredient_id: IngredientId,
    pub quantity: Decimal,
}

/// Input for updating a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ProductCategory>,
    pub price: Option<Decimal>,
    pub is_active: Option<bool>,
    /// When present, replaces the whole recipe.
    pub recipe: Option<Vec<RecipeLineInput>>,
}

/// Derive a URL slug from a product name.
///
/// Lowercases, maps runs of non-alphanumeric characters to single hyphens,
/// and trims leading/trailing hyphens.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Strawberry Short Cake"), "strawberry-short-cake");
    }

    #[test]
    fn test_slugify_punctuation() {
        assert_eq!(slugify("Sarah's  Best!  Cake"), "sarah-s-best-cake");
    }

    #[test]
    fn test_slugify_trims_hyphens() {
        assert_eq!(slugify("  Lemon Tart  "), "lemon-tart");
        assert_eq!(slugify("---"), "");
    }
}
