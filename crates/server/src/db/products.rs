//! Product catalog repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use shortcakes_core::{IngredientId, ProductCategory, ProductId};

use super::RepositoryError;
use crate::models::product::{
    CreateProductInput, Product, ProductWithRecipe, RecipeLine, RecipeLineInput,
    UpdateProductInput, slugify,
};

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    slug: String,
    description: String,
    category: ProductCategory,
    price: Decimal,
    image_path: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            category: row.category,
            price: row.price,
            image_path: row.image_path,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for recipe line queries.
#[derive(Debug, sqlx::FromRow)]
struct RecipeLineRow {
    ingredient_id: i32,
    ingredient_name: String,
    quantity: Decimal,
}

impl From<RecipeLineRow> for RecipeLine {
    fn from(row: RecipeLineRow) -> Self {
        Self {
            ingredient_id: IngredientId::new(row.ingredient_id),
            ingredient_name: row.ingredient_name,
            quantity: row.quantity,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, slug, description, category, price, image_path, \
                               is_active, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally filtered by category.
    ///
    /// `active_only` hides deactivated products (public catalog).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        active_only: bool,
        category: Option<ProductCategory>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product
             WHERE ($1 = false OR is_active)
               AND ($2::product_category IS NULL OR category = $2)
             ORDER BY name"
        ))
        .bind(active_only)
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get the recipe for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_recipe(&self, id: ProductId) -> Result<Vec<RecipeLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, RecipeLineRow>(
            "SELECT r.ingredient_id, i.name AS ingredient_name, r.quantity
             FROM recipe_line r
             JOIN inventory_item i ON i.id = r.ingredient_id
             WHERE r.product_id = $1
             ORDER BY i.name",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product with its recipe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_recipe(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithRecipe>, RepositoryError> {
        let Some(product) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let recipe = self.get_recipe(id).await?;
        Ok(Some(ProductWithRecipe { product, recipe }))
    }

    /// Create a product with its recipe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name or slug already exists.
    pub async fn create(&self, input: &CreateProductInput) -> Result<Product, RepositoryError> {
        let slug = slugify(&input.name);
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO product (name, slug, description, category, price)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&slug)
        .bind(&input.description)
        .bind(input.category)
        .bind(input.price)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("product name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let product_id = ProductId::new(row.id);
        replace_recipe(&mut tx, product_id, &input.recipe).await?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// Update a product. Absent fields are left unchanged; a present `recipe`
    /// replaces the whole recipe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        input: &UpdateProductInput,
    ) -> Result<Product, RepositoryError> {
        let slug = input.name.as_deref().map(slugify);
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE product SET
                 name = COALESCE($2, name),
                 slug = COALESCE($3, slug),
                 description = COALESCE($4, description),
                 category = COALESCE($5, category),
                 price = COALESCE($6, price),
                 is_active = COALESCE($7, is_active),
                 updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(input.name.as_deref())
        .bind(slug.as_deref())
        .bind(input.description.as_deref())
        .bind(input.category)
        .bind(input.price)
        .bind(input.is_active)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if let Some(recipe) = &input.recipe {
            sqlx::query("DELETE FROM recipe_line WHERE product_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            replace_recipe(&mut tx, id, recipe).await?;
        }

        tx.commit().await?;
        Ok(row.into())
    }

    /// Set the product image path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn set_image(&self, id: ProductId, path: &str) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE product SET image_path = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(path)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Insert recipe lines for a product inside an open transaction.
async fn replace_recipe(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: ProductId,
    lines: &[RecipeLineInput],
) -> Result<(), RepositoryError> {
    for line in lines {
        sqlx::query(
            "INSERT INTO recipe_line (product_id, ingredient_id, quantity) VALUES ($1, $2, $3)",
        )
        .bind(product_id)
        .bind(line.ingredient_id)
        .bind(line.quantity)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
