//! # Product Catalog Repository
//!
//! Product CRUD plus stock queries and updates. Stock is persisted
//! canonically in thousandths of the base unit (`stock_base_milli`), so
//! deduction elsewhere is a plain integer subtraction whatever unit the
//! sale was entered in.
//!
//! The tx helpers at the bottom are used by the credit and cash-sale
//! flows, which deduct stock inside their own transactions.

use std::sync::Arc;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use till_core::money::Money;
use till_core::types::Product;
use till_core::units::{BaseQuantity, Quantity};
use till_core::{CoreError, ValidationError};

use crate::error::{StoreError, StoreResult};
use crate::runtime::{Clock, IdGenerator};

// =============================================================================
// Shared Transaction Helpers
// =============================================================================

pub(crate) async fn fetch_product(
    conn: &mut SqliteConnection,
    id: &str,
) -> StoreResult<Product> {
    sqlx::query_as::<_, Product>(
        "SELECT id, name, price_cents, cost_cents, stock_base_milli, stock_unit, \
                created_at, updated_at, version \
         FROM products WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| StoreError::not_found("product", id))
}

/// Persists a new stock level with an optimistic version check, bumping
/// the product's in-memory `version` and `updated_at` to match.
pub(crate) async fn apply_stock(
    conn: &mut SqliteConnection,
    product: &mut Product,
    new_stock: BaseQuantity,
    now: chrono::DateTime<chrono::Utc>,
) -> StoreResult<()> {
    let result = sqlx::query(
        "UPDATE products \
         SET stock_base_milli = ?, updated_at = ?, version = version + 1 \
         WHERE id = ? AND version = ?",
    )
    .bind(new_stock.milli())
    .bind(now)
    .bind(&product.id)
    .bind(product.version)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() != 1 {
        return Err(StoreError::conflict("product", product.id.clone()));
    }

    product.stock_base_milli = new_stock.milli();
    product.updated_at = now;
    product.version += 1;
    Ok(())
}

// =============================================================================
// ProductRepository
// =============================================================================

/// Input for creating a product. Stock comes in as the quantity typed at
/// the counter (e.g. 5 kg) and is normalized to base milli on insert.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub initial_stock: Quantity,
}

/// Repository for the product catalog.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        ProductRepository { pool, clock, ids }
    }

    /// Inserts a new product.
    ///
    /// ## Rules
    /// - Name must be non-empty after trimming
    /// - Prices must be zero or greater
    /// - Initial stock must not be negative; zero is a valid out-of-stock
    ///   listing
    pub async fn insert(&self, new: NewProduct) -> StoreResult<Product> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::Validation(ValidationError::Required {
                field: "product name".to_string(),
            })
            .into());
        }
        if new.price_cents < 0 || new.cost_cents < 0 {
            return Err(CoreError::Validation(ValidationError::MustBeNonNegative {
                field: "price".to_string(),
            })
            .into());
        }
        if new.initial_stock.milli() < 0 {
            return Err(CoreError::Validation(ValidationError::MustBeNonNegative {
                field: "stock".to_string(),
            })
            .into());
        }

        let now = self.clock.now();
        let stock = new.initial_stock.to_base();
        let product = Product {
            id: self.ids.new_id(),
            name,
            price_cents: new.price_cents,
            cost_cents: new.cost_cents,
            stock_base_milli: stock.milli(),
            stock_unit: new.initial_stock.unit(),
            created_at: now,
            updated_at: now,
            version: 0,
        };

        sqlx::query(
            "INSERT INTO products \
                (id, name, price_cents, cost_cents, stock_base_milli, stock_unit, \
                 created_at, updated_at, version) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.stock_base_milli)
        .bind(product.stock_unit)
        .bind(product.created_at)
        .bind(product.updated_at)
        .bind(product.version)
        .execute(&self.pool)
        .await?;

        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Fetches a product by id.
    pub async fn get(&self, id: &str) -> StoreResult<Product> {
        let mut conn = self.pool.acquire().await?;
        fetch_product(&mut conn, id).await
    }

    /// All products, ordered by name.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, cost_cents, stock_base_milli, stock_unit, \
                    created_at, updated_at, version \
             FROM products ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Number of products in the catalog.
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Updates prices by id.
    pub async fn set_prices(&self, id: &str, price: Money, cost: Money) -> StoreResult<Product> {
        if price.is_negative() || cost.is_negative() {
            return Err(CoreError::Validation(ValidationError::MustBeNonNegative {
                field: "price".to_string(),
            })
            .into());
        }

        let mut tx = self.pool.begin().await?;
        let mut product = fetch_product(&mut tx, id).await?;
        let now = self.clock.now();

        let result = sqlx::query(
            "UPDATE products \
             SET price_cents = ?, cost_cents = ?, updated_at = ?, version = version + 1 \
             WHERE id = ? AND version = ?",
        )
        .bind(price.cents())
        .bind(cost.cents())
        .bind(now)
        .bind(id)
        .bind(product.version)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() != 1 {
            return Err(StoreError::conflict("product", id));
        }
        tx.commit().await?;

        product.price_cents = price.cents();
        product.cost_cents = cost.cents();
        product.updated_at = now;
        product.version += 1;

        debug!(id = %id, price_cents = price.cents(), "Product prices updated");
        Ok(product)
    }

    /// Overwrites a product's stock level with a counted quantity
    /// (restock or inventory correction).
    ///
    /// The quantity's unit must be in the same class as the product's
    /// stock unit; the display unit follows the entered quantity.
    pub async fn set_stock(&self, id: &str, quantity: Quantity) -> StoreResult<Product> {
        if quantity.milli() < 0 {
            return Err(CoreError::Validation(ValidationError::MustBeNonNegative {
                field: "stock".to_string(),
            })
            .into());
        }

        let mut tx = self.pool.begin().await?;
        let mut product = fetch_product(&mut tx, id).await?;

        if quantity.unit().class() != product.stock_unit.class() {
            return Err(CoreError::Validation(ValidationError::IncompatibleUnits {
                left: product.stock_unit.to_string(),
                right: quantity.unit().to_string(),
            })
            .into());
        }

        let now = self.clock.now();
        apply_stock(&mut tx, &mut product, quantity.to_base(), now).await?;

        sqlx::query("UPDATE products SET stock_unit = ? WHERE id = ?")
            .bind(quantity.unit())
            .bind(id)
            .execute(&mut *tx)
            .await?;
        product.stock_unit = quantity.unit();

        tx.commit().await?;

        debug!(id = %id, stock = %product.display_stock(), "Product stock set");
        Ok(product)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use till_core::units::Unit;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn rice() -> NewProduct {
        NewProduct {
            name: "Rice".to_string(),
            price_cents: 400,
            cost_cents: 250,
            initial_stock: Quantity::from_whole(5, Unit::Kilogram),
        }
    }

    #[tokio::test]
    async fn test_insert_normalizes_stock_to_base() {
        let db = db().await;
        let product = db.products().insert(rice()).await.unwrap();

        assert_eq!(product.stock_base_milli, 5_000_000); // 5000 g
        assert_eq!(product.stock_unit, Unit::Kilogram);
        assert_eq!(product.display_stock().to_string(), "5 kg");

        let fetched = db.products().get(&product.id).await.unwrap();
        assert_eq!(fetched, product);
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_name_and_negative_price() {
        let db = db().await;
        let mut p = rice();
        p.name = "   ".to_string();
        assert!(db.products().insert(p).await.is_err());

        let mut p = rice();
        p.price_cents = -1;
        assert!(db.products().insert(p).await.is_err());
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let db = db().await;
        let err = db.products().get("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let db = db().await;
        let products = db.products();

        let mut a = rice();
        a.name = "Sugar".to_string();
        products.insert(a).await.unwrap();
        products.insert(rice()).await.unwrap();

        let all = products.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Rice");
        assert_eq!(all[1].name, "Sugar");
        assert_eq!(products.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_set_stock_changes_display_unit() {
        let db = db().await;
        let product = db.products().insert(rice()).await.unwrap();

        // Restock counted in grams
        let updated = db
            .products()
            .set_stock(&product.id, Quantity::from_whole(2500, Unit::Gram))
            .await
            .unwrap();
        assert_eq!(updated.stock_base_milli, 2_500_000);
        assert_eq!(updated.stock_unit, Unit::Gram);
        assert_eq!(updated.version, product.version + 1);
    }

    #[tokio::test]
    async fn test_set_stock_rejects_cross_class() {
        let db = db().await;
        let product = db.products().insert(rice()).await.unwrap();

        let err = db
            .products()
            .set_stock(&product.id, Quantity::from_whole(1, Unit::Liter))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_prices() {
        let db = db().await;
        let product = db.products().insert(rice()).await.unwrap();

        let updated = db
            .products()
            .set_prices(&product.id, Money::from_cents(450), Money::from_cents(300))
            .await
            .unwrap();
        assert_eq!(updated.price_cents, 450);
        assert_eq!(updated.cost_cents, 300);

        let fetched = db.products().get(&product.id).await.unwrap();
        assert_eq!(fetched.price_cents, 450);
    }
}
