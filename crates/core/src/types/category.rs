//! Category enums for products and ingredients.

use serde::{Deserialize, Serialize};

/// Product category shown in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "product_category", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Cakes,
    Cupcakes,
    Cookies,
    Seasonal,
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Cakes => "cakes",
            Self::Cupcakes => "cupcakes",
            Self::Cookies => "cookies",
            Self::Seasonal => "seasonal",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cakes" => Ok(Self::Cakes),
            "cupcakes" => Ok(Self::Cupcakes),
            "cookies" => Ok(Self::Cookies),
            "seasonal" => Ok(Self::Seasonal),
            _ => Err(format!("invalid product category: {s}")),
        }
    }
}

/// Ingredient category used for inventory grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "ingredient_category", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    Dry,
    Dairy,
    Produce,
    Packaging,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_category_roundtrip() {
        for cat in [
            ProductCategory::Cakes,
            ProductCategory::Cupcakes,
            ProductCategory::Cookies,
            ProductCategory::Seasonal,
        ] {
            let parsed: ProductCategory = cat.to_string().parse().expect("roundtrip");
            assert_eq!(parsed, cat);
        }
    }

    #[test]
    fn test_invalid_category() {
        assert!("breads".parse::<ProductCategory>().is_err());
    }
}
