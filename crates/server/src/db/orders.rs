//! Order repository.
//!
//! Orders are created fully-priced by the checkout service; this layer
//! persists them, lists them, and runs guarded status transitions. The
//! `pending → confirmed` transition and its inventory deduction run inside
//! one transaction driven by `services::orders`; the free functions taking
//! `&mut PgConnection` are its building blocks.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use shortcakes_core::{
    CustomerId, DeliveryZoneId, Fulfillment, IngredientId, OrderId, OrderItemId, OrderStatus,
    PaymentMethod, PaymentStatus, ProductId,
};

use super::{PAGE_SIZE, RepositoryError, page_offset};
use crate::models::order::{
    Order, OrderFilter, OrderItem, OrderWithItems, ProductSales, SalesReport, StatusCount,
};

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_number: String,
    customer_id: Option<i32>,
    contact_name: String,
    contact_email: String,
    contact_phone: Option<String>,
    fulfillment: Fulfillment,
    delivery_address: Option<String>,
    delivery_zone_id: Option<i32>,
    scheduled_for: Option<DateTime<Utc>>,
    status: OrderStatus,
    payment_status: PaymentStatus,
    payment_method: PaymentMethod,
    payment_transaction_id: Option<String>,
    payment_confirmation: Option<String>,
    subtotal: Decimal,
    delivery_fee: Decimal,
    discount: Decimal,
    total: Decimal,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            order_number: row.order_number,
            customer_id: row.customer_id.map(CustomerId::new),
            contact_name: row.contact_name,
            contact_email: row.contact_email,
            contact_phone: row.contact_phone,
            fulfillment: row.fulfillment,
            delivery_address: row.delivery_address,
            delivery_zone_id: row.delivery_zone_id.map(DeliveryZoneId::new),
            scheduled_for: row.scheduled_for,
            status: row.status,
            payment_status: row.payment_status,
            payment_method: row.payment_method,
            payment_transaction_id: row.payment_transaction_id,
            payment_confirmation: row.payment_confirmation,
            subtotal: row.subtotal,
            delivery_fee: row.delivery_fee,
            discount: row.discount,
            total: row.total,
            note: row.note,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for order line queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    product_name: String,
    unit_price: Decimal,
    quantity: i32,
    customization: Option<String>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            unit_price: row.unit_price,
            quantity: row.quantity,
            customization: row.customization,
        }
    }
}

const ORDER_COLUMNS: &str = "id, order_number, customer_id, contact_name, contact_email, \
     contact_phone, fulfillment, delivery_address, delivery_zone_id, scheduled_for, status, \
     payment_status, payment_method, payment_transaction_id, payment_confirmation, subtotal, \
     delivery_fee, discount, total, note, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, product_id, product_name, unit_price, quantity, customization";

/// Fully-priced order data produced by the checkout service.
#[derive(Debug, Clone)]
pub struct CreateOrderData {
    pub order_number: String,
    pub customer_id: Option<CustomerId>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub fulfillment: Fulfillment,
    pub delivery_address: Option<String>,
    pub delivery_zone_id: Option<DeliveryZoneId>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub payment_method: PaymentMethod,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub note: Option<String>,
    pub items: Vec<CreateOrderItemData>,
}

/// One priced line of a new order.
#[derive(Debug, Clone)]
pub struct CreateOrderItemData {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub customization: Option<String>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, data: &CreateOrderData) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (order_number, customer_id, contact_name, contact_email,
                 contact_phone, fulfillment, delivery_address, delivery_zone_id, scheduled_for,
                 payment_method, subtotal, delivery_fee, discount, total, note)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&data.order_number)
        .bind(data.customer_id)
        .bind(&data.contact_name)
        .bind(&data.contact_email)
        .bind(data.contact_phone.as_deref())
        .bind(data.fulfillment)
        .bind(data.delivery_address.as_deref())
        .bind(data.delivery_zone_id)
        .bind(data.scheduled_for)
        .bind(data.payment_method)
        .bind(data.subtotal)
        .bind(data.delivery_fee)
        .bind(data.discount)
        .bind(data.total)
        .bind(data.note.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        let order_id = OrderId::new(row.id);
        let mut items = Vec::with_capacity(data.items.len());
        for item in &data.items {
            let item_row = sqlx::query_as::<_, OrderItemRow>(&format!(
                "INSERT INTO order_item (order_id, product_id, product_name, unit_price,
                     quantity, customization)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING {ORDER_ITEM_COLUMNS}"
            ))
            .bind(order_id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.unit_price)
            .bind(item.quantity)
            .bind(item.customization.as_deref())
            .fetch_one(&mut *tx)
            .await?;
            items.push(item_row.into());
        }

        tx.commit().await?;
        Ok(OrderWithItems {
            order: row.into(),
            items,
        })
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get an order by its human-readable number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_number(&self, number: &str) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
        ))
        .bind(number)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List the lines of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_item WHERE order_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Load an order and its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_items(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let Some(order) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.items(id).await?;
        Ok(Some(OrderWithItems { order, items }))
    }

    /// List a customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE customer_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List orders for the admin dashboard, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE ($1::order_status IS NULL OR status = $1)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(filter.status)
        .bind(PAGE_SIZE)
        .bind(page_offset(filter.page.unwrap_or(1)))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Run a guarded status transition outside the confirmation flow.
    ///
    /// The row is only updated when its current status still matches `from`,
    /// so concurrent transitions cannot double-apply.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn transition(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET status = $3, updated_at = now() WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Record the outcome of a payment attempt.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn set_payment_result(
        &self,
        id: OrderId,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET payment_status = $2, payment_transaction_id = $3,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .bind(transaction_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Attach an uploaded payment confirmation file to an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn set_payment_confirmation(
        &self,
        id: OrderId,
        path: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET payment_confirmation = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(path)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Build the sales report for a date window (`from` inclusive, `to`
    /// exclusive). Cancelled orders are excluded; revenue counts paid orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_report(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<SalesReport, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Totals {
            order_count: i64,
            revenue: Decimal,
        }

        let totals = sqlx::query_as::<_, Totals>(
            "SELECT COUNT(*) FILTER (WHERE status <> 'cancelled') AS order_count,
                    COALESCE(SUM(total) FILTER (WHERE payment_status = 'paid'
                        AND status <> 'cancelled'), 0) AS revenue
             FROM orders
             WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        let paid_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders
             WHERE created_at >= $1 AND created_at < $2
               AND payment_status = 'paid' AND status <> 'cancelled'",
        )
        .bind(from)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        #[derive(sqlx::FromRow)]
        struct StatusRow {
            status: OrderStatus,
            count: i64,
        }

        let by_status = sqlx::query_as::<_, StatusRow>(
            "SELECT status, COUNT(*) AS count FROM orders
             WHERE created_at >= $1 AND created_at < $2
             GROUP BY status
             ORDER BY status",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        #[derive(sqlx::FromRow)]
        struct TopRow {
            product_id: i32,
            product_name: String,
            units: i64,
            revenue: Decimal,
        }

        let top_products = sqlx::query_as::<_, TopRow>(
            "SELECT oi.product_id, oi.product_name,
                    SUM(oi.quantity)::bigint AS units,
                    SUM(oi.unit_price * oi.quantity) AS revenue
             FROM order_item oi
             JOIN orders o ON o.id = oi.order_id
             WHERE o.created_at >= $1 AND o.created_at < $2 AND o.status <> 'cancelled'
             GROUP BY oi.product_id, oi.product_name
             ORDER BY units DESC
             LIMIT 10",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        let average_order_value = if paid_count > 0 {
            totals.revenue / Decimal::from(paid_count)
        } else {
            Decimal::ZERO
        };

        Ok(SalesReport {
            from,
            to,
            order_count: totals.order_count,
            revenue: totals.revenue,
            average_order_value,
            by_status: by_status
                .into_iter()
                .map(|r| StatusCount {
                    status: r.status,
                    count: r.count,
                })
                .collect(),
            top_products: top_products
                .into_iter()
                .map(|r| ProductSales {
                    product_id: ProductId::new(r.product_id),
                    product_name: r.product_name,
                    units: r.units,
                    revenue: r.revenue,
                })
                .collect(),
        })
    }
}

/// Claim the `pending → confirmed` transition inside the caller's
/// transaction. Returns `false` when the order was not in `pending`
/// (already confirmed, cancelled, or missing), in which case the caller
/// must not deduct inventory.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn claim_confirmation(
    conn: &mut PgConnection,
    id: OrderId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        "UPDATE orders SET status = 'confirmed', updated_at = now()
         WHERE id = $1 AND status = 'pending'",
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Total recipe demand of an order, aggregated per ingredient, inside the
/// caller's transaction: `recipe quantity × ordered quantity` summed over
/// the order's lines.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn recipe_demands(
    conn: &mut PgConnection,
    id: OrderId,
) -> Result<Vec<(IngredientId, Decimal)>, RepositoryError> {
    #[derive(sqlx::FromRow)]
    struct DemandRow {
        ingredient_id: i32,
        amount: Decimal,
    }

    let rows = sqlx::query_as::<_, DemandRow>(
        "SELECT rl.ingredient_id, SUM(rl.quantity * oi.quantity) AS amount
         FROM order_item oi
         JOIN recipe_line rl ON rl.product_id = oi.product_id
         WHERE oi.order_id = $1
         GROUP BY rl.ingredient_id
         ORDER BY rl.ingredient_id",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| (IngredientId::new(r.ingredient_id), r.amount))
        .collect())
}
