//! Integration tests for the admin dashboard flow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed data applied
//! - The server running (cargo run -p shortcakes-server)
//! - An admin account, with credentials in `SSC_TEST_ADMIN_EMAIL` /
//!   `SSC_TEST_ADMIN_PASSWORD`
//!
//! Run with: cargo test -p shortcakes-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use shortcakes_integration_tests::{admin_token, base_url, client, register_and_login};

#[tokio::test]
#[ignore = "Requires running server and admin credentials"]
async fn test_admin_routes_reject_customers() {
    let client = client();
    let base_url = base_url();
    let (_, token) = register_and_login(&client).await;

    let resp = client
        .get(format!("{base_url}/api/admin/orders"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("admin orders request");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .get(format!("{base_url}/api/admin/orders"))
        .send()
        .await
        .expect("anonymous admin orders request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and admin credentials"]
async fn test_inventory_restock_and_report() {
    let client = client();
    let base_url = base_url();
    let token = admin_token(&client).await;

    let items: Vec<Value> = client
        .get(format!("{base_url}/api/admin/inventory"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("inventory request")
        .json()
        .await
        .expect("inventory json");
    assert!(!items.is_empty(), "seed data should include ingredients");

    let item_id = items[0]["id"].as_i64().expect("item id");

    // Restock appends a movement
    let resp = client
        .post(format!("{base_url}/api/admin/inventory/{item_id}/restock"))
        .bearer_auth(&token)
        .json(&json!({ "quantity": "500", "note": "integration test delivery" }))
        .send()
        .await
        .expect("restock request");
    assert_eq!(resp.status(), StatusCode::OK);

    let movements: Vec<Value> = client
        .get(format!("{base_url}/api/admin/inventory/{item_id}/movements"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("movements request")
        .json()
        .await
        .expect("movements json");
    assert!(movements.iter().any(|m| m["kind"] == "restock"));

    // Restock report and trend endpoints answer for any state
    let resp = client
        .get(format!("{base_url}/api/admin/inventory/restock-report"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("report request");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/api/admin/inventory/{item_id}/trend?days=30"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("trend request");
    assert_eq!(resp.status(), StatusCode::OK);
    let trend: Value = resp.json().await.expect("trend json");
    assert!(trend["direction"].is_string());
}

#[tokio::test]
#[ignore = "Requires running server, seed data and admin credentials"]
async fn test_order_confirmation_deducts_inventory_once() {
    let client = client();
    let base_url = base_url();
    let admin = admin_token(&client).await;
    let (email, customer) = register_and_login(&client).await;

    // Place a cash pickup order for a product with a recipe
    let products: Vec<Value> = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("products request")
        .json()
        .await
        .expect("products json");
    let product_id = products[0]["id"].as_i64().expect("product id");

    client
        .post(format!("{base_url}/api/cart/items"))
        .bearer_auth(&customer)
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("add to cart request");

    let order: Value = client
        .post(format!("{base_url}/api/checkout"))
        .bearer_auth(&customer)
        .json(&json!({
            "contact_name": "Deduction Test",
            "contact_email": email,
            "fulfillment": "pickup",
            "payment_method": "cash",
        }))
        .send()
        .await
        .expect("checkout request")
        .json()
        .await
        .expect("order json");
    let order_id = order["id"].as_i64().expect("order id");

    // Recipe of the ordered product, to know which ingredient to watch
    let detail: Value = client
        .get(format!("{base_url}/api/admin/products/{product_id}"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("product detail request")
        .json()
        .await
        .expect("detail json");
    let recipe = detail["recipe"].as_array().expect("recipe");
    assert!(!recipe.is_empty(), "seeded products carry recipes");
    let ingredient_id = recipe[0]["ingredient_id"].as_i64().expect("ingredient id");

    let quantity_before = ingredient_quantity(&client, &admin, ingredient_id).await;

    // First confirmation succeeds and deducts
    let resp = client
        .post(format!("{base_url}/api/admin/orders/{order_id}/status"))
        .bearer_auth(&admin)
        .json(&json!({ "status": "confirmed" }))
        .send()
        .await
        .expect("confirm request");
    assert_eq!(resp.status(), StatusCode::OK);

    let quantity_after = ingredient_quantity(&client, &admin, ingredient_id).await;
    assert!(
        quantity_after < quantity_before,
        "confirmation must deduct the recipe ingredient"
    );

    // A second confirmation is rejected and deducts nothing
    let resp = client
        .post(format!("{base_url}/api/admin/orders/{order_id}/status"))
        .bearer_auth(&admin)
        .json(&json!({ "status": "confirmed" }))
        .send()
        .await
        .expect("second confirm request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let quantity_final = ingredient_quantity(&client, &admin, ingredient_id).await;
    assert_eq!(
        quantity_after, quantity_final,
        "a repeated confirmation must not deduct again"
    );
}

#[tokio::test]
#[ignore = "Requires running server and admin credentials"]
async fn test_sales_report_shape() {
    let client = client();
    let base_url = base_url();
    let token = admin_token(&client).await;

    let report: Value = client
        .get(format!("{base_url}/api/admin/reports/sales"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("report request")
        .json()
        .await
        .expect("report json");

    assert!(report["order_count"].is_i64() || report["order_count"].is_u64());
    assert!(report["by_status"].is_array());
    assert!(report["top_products"].is_array());
}

/// Read an ingredient's current quantity (Decimal serializes as a string).
async fn ingredient_quantity(client: &reqwest::Client, token: &str, id: i64) -> f64 {
    let item: Value = client
        .get(format!("{}/api/admin/inventory/{id}", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("inventory item request")
        .json()
        .await
        .expect("item json");
    item["quantity"]
        .as_str()
        .expect("quantity string")
        .parse()
        .expect("quantity parses")
}
