//! Seed the database with sample data.
//!
//! Inserts a small catalog of products with recipes, the ingredients they
//! consume, one delivery zone, and one promotion. Existing rows (matched by
//! name/code) are left alone, so the command is safe to re-run.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::info;

use shortcakes_core::{IngredientCategory, IngredientId, ProductCategory};
use shortcakes_server::db::{
    self, DeliveryZoneRepository, InventoryRepository, ProductRepository, PromotionRepository,
};
use shortcakes_server::models::delivery_zone::CreateZoneInput;
use shortcakes_server::models::inventory::CreateItemInput;
use shortcakes_server::models::product::{CreateProductInput, RecipeLineInput};
use shortcakes_server::models::promotion::CreatePromotionInput;

fn dec(s: &str) -> Decimal {
    s.parse().expect("seed literal is a valid decimal")
}

struct SeedIngredient {
    name: &'static str,
    category: IngredientCategory,
    quantity: &'static str,
    unit: &'static str,
    threshold: &'static str,
    cost_per_unit: &'static str,
}

const INGREDIENTS: &[SeedIngredient] = &[
    SeedIngredient {
        name: "flour",
        category: IngredientCategory::Dry,
        quantity: "25000",
        unit: "g",
        threshold: "5000",
        cost_per_unit: "0.002",
    },
    SeedIngredient {
        name: "sugar",
        category: IngredientCategory::Dry,
        quantity: "15000",
        unit: "g",
        threshold: "3000",
        cost_per_unit: "0.003",
    },
    SeedIngredient {
        name: "butter",
        category: IngredientCategory::Dairy,
        quantity: "8000",
        unit: "g",
        threshold: "2000",
        cost_per_unit: "0.012",
    },
    SeedIngredient {
        name: "eggs",
        category: IngredientCategory::Dairy,
        quantity: "200",
        unit: "unit",
        threshold: "48",
        cost_per_unit: "0.35",
    },
    SeedIngredient {
        name: "heavy cream",
        category: IngredientCategory::Dairy,
        quantity: "6000",
        unit: "ml",
        threshold: "1500",
        cost_per_unit: "0.006",
    },
    SeedIngredient {
        name: "strawberries",
        category: IngredientCategory::Produce,
        quantity: "5000",
        unit: "g",
        threshold: "1000",
        cost_per_unit: "0.009",
    },
    SeedIngredient {
        name: "cocoa powder",
        category: IngredientCategory::Dry,
        quantity: "3000",
        unit: "g",
        threshold: "600",
        cost_per_unit: "0.015",
    },
    SeedIngredient {
        name: "cake boxes",
        category: IngredientCategory::Packaging,
        quantity: "120",
        unit: "unit",
        threshold: "30",
        cost_per_unit: "0.80",
    },
];

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    category: ProductCategory,
    price: &'static str,
    recipe: &'static [(&'static str, &'static str)],
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Strawberry Short Cake",
        description: "The house classic: vanilla sponge, whipped cream, fresh strawberries.",
        category: ProductCategory::Cakes,
        price: "28.50",
        recipe: &[
            ("flour", "400"),
            ("sugar", "250"),
            ("butter", "200"),
            ("eggs", "4"),
            ("heavy cream", "300"),
            ("strawberries", "350"),
            ("cake boxes", "1"),
        ],
    },
    SeedProduct {
        name: "Chocolate Fudge Cake",
        description: "Dense chocolate sponge with a dark fudge glaze.",
        category: ProductCategory::Cakes,
        price: "26.00",
        recipe: &[
            ("flour", "350"),
            ("sugar", "300"),
            ("butter", "250"),
            ("eggs", "5"),
            ("cocoa powder", "120"),
            ("cake boxes", "1"),
        ],
    },
    SeedProduct {
        name: "Vanilla Cupcake",
        description: "A soft vanilla cupcake with buttercream swirl.",
        category: ProductCategory::Cupcakes,
        price: "3.75",
        recipe: &[
            ("flour", "40"),
            ("sugar", "35"),
            ("butter", "30"),
            ("eggs", "1"),
        ],
    },
    SeedProduct {
        name: "Brown Butter Cookie",
        description: "Chewy middle, crisp edge, plenty of brown butter.",
        category: ProductCategory::Cookies,
        price: "2.50",
        recipe: &[("flour", "30"), ("sugar", "20"), ("butter", "18"), ("eggs", "1")],
    },
];

/// Seed products, recipes, inventory, a delivery zone and a promotion.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    // Ingredients first; recipes reference them by ID.
    let inventory = InventoryRepository::new(&pool);
    let existing = inventory.list().await?;
    let mut ingredient_ids: std::collections::HashMap<String, IngredientId> = existing
        .iter()
        .map(|i| (i.name.clone(), i.id))
        .collect();

    let mut created_ingredients = 0usize;
    for seed in INGREDIENTS {
        if ingredient_ids.contains_key(seed.name) {
            continue;
        }
        let item = inventory
            .create(&CreateItemInput {
                name: seed.name.to_string(),
                category: seed.category,
                quantity: dec(seed.quantity),
                unit: seed.unit.to_string(),
                threshold: dec(seed.threshold),
                cost_per_unit: dec(seed.cost_per_unit),
            })
            .await?;
        ingredient_ids.insert(item.name.clone(), item.id);
        created_ingredients += 1;
    }

    // Products with recipes.
    let products = ProductRepository::new(&pool);
    let existing_products = products.list(false, None).await?;
    let mut created_products = 0usize;
    for seed in PRODUCTS {
        if existing_products.iter().any(|p| p.name == seed.name) {
            continue;
        }
        let recipe = seed
            .recipe
            .iter()
            .map(|(ingredient, quantity)| {
                let id = ingredient_ids
                    .get(*ingredient)
                    .copied()
                    .ok_or_else(|| format!("seed recipe references unknown ingredient {ingredient}"))?;
                Ok(RecipeLineInput {
                    ingredient_id: id,
                    quantity: dec(quantity),
                })
            })
            .collect::<Result<Vec<_>, String>>()?;

        products
            .create(&CreateProductInput {
                name: seed.name.to_string(),
                description: seed.description.to_string(),
                category: seed.category,
                price: dec(seed.price),
                recipe,
            })
            .await?;
        created_products += 1;
    }

    // One delivery zone covering the neighborhood.
    let zones = DeliveryZoneRepository::new(&pool);
    if zones.list().await?.is_empty() {
        zones
            .create(&CreateZoneInput {
                name: "Downtown".to_string(),
                postal_prefixes: vec!["100".to_string(), "101".to_string()],
                fee: dec("5.00"),
                is_active: true,
            })
            .await?;
        info!("Created delivery zone 'Downtown'");
    }

    // A welcome promotion.
    let promotions = PromotionRepository::new(&pool);
    if promotions.get_by_code("WELCOME10").await?.is_none() {
        let now = Utc::now();
        promotions
            .create(&CreatePromotionInput {
                code: "WELCOME10".to_string(),
                description: "10% off your first order".to_string(),
                percent_off: 10,
                starts_at: now,
                ends_at: now + Duration::days(365),
                is_active: true,
            })
            .await?;
        info!("Created promotion WELCOME10");
    }

    info!(
        ingredients = created_ingredients,
        products = created_products,
        "Seeding complete"
    );
    Ok(())
}
