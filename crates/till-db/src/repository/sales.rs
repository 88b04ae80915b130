//! # Cash-Sale Flow
//!
//! A sale paid on the spot touches two aggregates in one transaction:
//! the product (stock deduction) and today's session (an Income movement
//! carrying the sale's profit).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_cash_sale(product, 2.5 kg, Cash)                                │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    today's session?        ← absent/closed → SessionState, prompt open │
//! │    deduct stock            ← insufficient → error, nothing written     │
//! │    line total = price × base-converted qty   (same conversion table    │
//! │    profit     = (price − cost) × qty          as the stock math)       │
//! │    INSERT movement { kind: Income, source: Sale { profit } }           │
//! │    UPDATE product stock, session accumulators                          │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use till_core::money::Money;
use till_core::types::{Movement, MovementKind, MovementSource, PaymentMethod, Product};
use till_core::units::{self, Quantity};
use till_core::CoreError;

use crate::error::StoreResult;
use crate::events::{LedgerEvent, NotificationSink};
use crate::repository::product::{apply_stock, fetch_product};
use crate::repository::session::{
    bump_session, fetch_session_for, insert_movement, next_position,
};
use crate::runtime::{Clock, IdGenerator};

// =============================================================================
// SaleService
// =============================================================================

/// What the counter gets back after a cash sale: the ledger movement and
/// the product with its reduced stock.
#[derive(Debug, Clone)]
pub struct CashSaleReceipt {
    pub movement: Movement,
    pub product: Product,
    pub line_total: Money,
    pub profit: Money,
}

/// Orchestrates the cash-sale flow across products and the session ledger.
#[derive(Debug, Clone)]
pub struct SaleService {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    events: Arc<dyn NotificationSink>,
}

impl SaleService {
    pub fn new(
        pool: SqlitePool,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        events: Arc<dyn NotificationSink>,
    ) -> Self {
        SaleService {
            pool,
            clock,
            ids,
            events,
        }
    }

    /// Records a sale paid immediately.
    ///
    /// Requires an Open session for today; an absent or closed one is a
    /// SessionState error and nothing is written (the caller prompts the
    /// user to open a session, never opens one itself).
    pub async fn record_cash_sale(
        &self,
        product_id: &str,
        quantity: Quantity,
        method: PaymentMethod,
    ) -> StoreResult<CashSaleReceipt> {
        let today = self.clock.today();
        let now = self.clock.now();

        let mut tx = self.pool.begin().await?;

        let mut session = fetch_session_for(&mut tx, today, "record sale").await?;
        session.ensure_open("record sale")?;

        let mut product = fetch_product(&mut tx, product_id).await?;

        let remaining = match units::deduct(&product.id, product.stock(), quantity) {
            Ok(remaining) => remaining,
            Err(err) => {
                if matches!(err, CoreError::InsufficientStock { .. }) {
                    self.events.notify(LedgerEvent::InsufficientStock {
                        product_id: product.id.clone(),
                    });
                }
                return Err(err.into());
            }
        };
        apply_stock(&mut tx, &mut product, remaining, now).await?;

        let line_total = units::extended_price(product.price(), product.stock_unit, quantity)?;
        let cost_total = units::extended_price(product.cost(), product.stock_unit, quantity)?;
        let profit = line_total - cost_total;

        let movement = Movement {
            id: self.ids.new_id(),
            session_date: today,
            position: next_position(&mut tx, today).await?,
            kind: MovementKind::Income,
            method,
            amount_cents: line_total.cents(),
            label: Some(format!("{} {}", product.name, quantity)),
            source: MovementSource::Sale {
                sale_id: self.ids.new_id(),
                product_id: product.id.clone(),
                profit_cents: profit.cents(),
            },
            created_at: now,
        };

        session.apply_append(&movement)?;
        insert_movement(&mut tx, &movement).await?;
        bump_session(&mut tx, &mut session).await?;

        tx.commit().await?;

        info!(
            date = %today,
            product_id = %product.id,
            quantity = %quantity,
            amount_cents = line_total.cents(),
            profit_cents = profit.cents(),
            "Cash sale recorded"
        );
        self.events.notify(LedgerEvent::MovementAppended {
            date: today,
            movement_id: movement.id.clone(),
            kind: MovementKind::Income,
            amount_cents: movement.amount_cents,
        });

        Ok(CashSaleReceipt {
            movement,
            product,
            line_total,
            profit,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::events::MemorySink;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;
    use crate::runtime::{FixedClock, SequenceIds};
    use chrono::{NaiveDate, Utc};
    use till_core::units::Unit;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    async fn harness() -> (Database, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::default());
        let clock = Arc::new(FixedClock {
            date: date(),
            at: Utc::now(),
        });
        let db = Database::with_runtime(
            DbConfig::in_memory(),
            clock,
            Arc::new(SequenceIds::default()),
            sink.clone(),
        )
        .await
        .unwrap();
        (db, sink)
    }

    async fn seed_rice(db: &Database) -> String {
        // $4.00/kg sell, $2.50/kg cost, 5 kg on hand
        db.products()
            .insert(NewProduct {
                name: "Rice".to_string(),
                price_cents: 400,
                cost_cents: 250,
                initial_stock: Quantity::from_whole(5, Unit::Kilogram),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_cash_sale_deducts_stock_and_posts_movement() {
        // 2.5 kg at $4.00/kg: $10.00 income, $3.75 profit, 2.5 kg left.
        let (db, _) = harness().await;
        db.sessions().open(date(), Money::zero()).await.unwrap();
        let product_id = seed_rice(&db).await;

        let receipt = db
            .sales()
            .record_cash_sale(
                &product_id,
                Quantity::new(2500, Unit::Kilogram),
                PaymentMethod::Cash,
            )
            .await
            .unwrap();

        assert_eq!(receipt.line_total.cents(), 1000);
        assert_eq!(receipt.profit.cents(), 375);
        assert_eq!(receipt.product.stock_base_milli, 2_500_000);
        assert_eq!(receipt.product.display_stock().to_string(), "2.5 kg");
        assert_eq!(receipt.movement.source.profit_cents(), 375);

        let view = db.sessions().get(date()).await.unwrap();
        assert_eq!(view.session.income_cents, 1000);
        assert_eq!(view.session.profit_cents, 375);
        assert_eq!(view.movements.len(), 1);
    }

    #[tokio::test]
    async fn test_cash_sale_without_session_is_session_state() {
        let (db, _) = harness().await;
        let product_id = seed_rice(&db).await;

        let err = db
            .sales()
            .record_cash_sale(
                &product_id,
                Quantity::from_whole(1, Unit::Kilogram),
                PaymentMethod::Cash,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::SessionState { found: "absent", .. })
        ));

        // Stock untouched
        let product = db.products().get(&product_id).await.unwrap();
        assert_eq!(product.stock_base_milli, 5_000_000);
    }

    #[tokio::test]
    async fn test_cash_sale_on_closed_session_is_session_state() {
        let (db, _) = harness().await;
        db.sessions().open(date(), Money::zero()).await.unwrap();
        db.sessions().close(date(), Money::zero()).await.unwrap();
        let product_id = seed_rice(&db).await;

        let err = db
            .sales()
            .record_cash_sale(
                &product_id,
                Quantity::from_whole(1, Unit::Kilogram),
                PaymentMethod::Cash,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::SessionState { found: "closed", .. })
        ));
    }

    #[tokio::test]
    async fn test_cash_sale_insufficient_stock_leaves_everything_unchanged() {
        let (db, sink) = harness().await;
        db.sessions().open(date(), Money::zero()).await.unwrap();
        let product_id = seed_rice(&db).await;

        let err = db
            .sales()
            .record_cash_sale(
                &product_id,
                Quantity::from_whole(6, Unit::Kilogram),
                PaymentMethod::Cash,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock { .. })
        ));

        let product = db.products().get(&product_id).await.unwrap();
        assert_eq!(product.stock_base_milli, 5_000_000);
        let view = db.sessions().get(date()).await.unwrap();
        assert!(view.movements.is_empty());
        assert_eq!(view.session.income_cents, 0);

        assert!(sink
            .take()
            .iter()
            .any(|e| matches!(e, LedgerEvent::InsufficientStock { .. })));
    }

    #[tokio::test]
    async fn test_selling_exact_stock_reaches_zero() {
        let (db, _) = harness().await;
        db.sessions().open(date(), Money::zero()).await.unwrap();
        let product_id = seed_rice(&db).await;

        let receipt = db
            .sales()
            .record_cash_sale(
                &product_id,
                Quantity::from_whole(5, Unit::Kilogram),
                PaymentMethod::Card,
            )
            .await
            .unwrap();
        assert_eq!(receipt.product.stock_base_milli, 0);
        assert_eq!(receipt.movement.method, PaymentMethod::Card);
    }
}
